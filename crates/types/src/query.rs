//! Typed request options and their query-string encoding.
//!
//! Every option the provider recognizes is a field here. Deserializing an
//! options object with an unknown key fails (`deny_unknown_fields`), and
//! [`QueryOptions::from_params`] rejects unknown parameters the same way.
//!
//! ```ignore
//! let opts = QueryOptions::new()
//!     .time_format(TimeFormat::Ms)
//!     .page(0)
//!     .size(5);
//! assert_eq!(opts.to_params().get("size"), Some("5"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use web3data_common::constants::DEFAULT_CURRENCY;
use web3data_common::{QueryParams, Web3DataError, Web3DataResult};

use crate::de::{one_or_many, split_list};
use crate::time::Timestamp;

// ── Wire parameter names ────────────────────────────────────────────

pub const PARAM_TIME_FORMAT: &str = "timeFormat";
pub const PARAM_VALIDATION_METHOD: &str = "validationMethod";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_SIZE: &str = "size";
pub const PARAM_START_DATE: &str = "startDate";
pub const PARAM_END_DATE: &str = "endDate";
pub const PARAM_INCLUDE_PRICE: &str = "includePrice";
pub const PARAM_INCLUDE_TOKENS: &str = "includeTokens";
pub const PARAM_CURRENCY: &str = "currency";
pub const PARAM_EXCHANGE: &str = "exchange";
pub const PARAM_SORT_TYPE: &str = "sortType";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_BLOCK_NUMBER: &str = "blockNumber";
pub const PARAM_QUOTE: &str = "quote";
pub const PARAM_DIRECTION: &str = "direction";

/// How timestamps are rendered in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    Ms,
    Iso,
}

impl TimeFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFormat::Ms => "ms",
            TimeFormat::Iso => "iso",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFormat {
    type Err = Web3DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "milliseconds" => Ok(TimeFormat::Ms),
            "iso" | "iso8601" => Ok(TimeFormat::Iso),
            other => Err(Web3DataError::InvalidOption(format!("{PARAM_TIME_FORMAT}={other}"))),
        }
    }
}

/// Level of `validation` detail attached to each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMethod {
    None,
    Basic,
    Full,
}

impl ValidationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationMethod::None => "none",
            ValidationMethod::Basic => "basic",
            ValidationMethod::Full => "full",
        }
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMethod {
    type Err = Web3DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ValidationMethod::None),
            "basic" => Ok(ValidationMethod::Basic),
            "full" => Ok(ValidationMethod::Full),
            other => Err(Web3DataError::InvalidOption(format!(
                "{PARAM_VALIDATION_METHOD}={other}"
            ))),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Every option a resource method accepts. Unset fields are omitted from
/// the request, so `QueryOptions::default()` is the same as no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_method: Option<ValidationMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Upper bound on the number of returned records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Presence of either date switches the response to a historical series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub include_price: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub include_tokens: bool,

    /// Price currency; enrichment falls back to `usd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub exchange: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<String>,

    /// Address type filter (`EOA`, `CONTRACT`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Builder ──────────────────────────────────────────────────────

    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = Some(format);
        self
    }

    pub fn validation_method(mut self, method: ValidationMethod) -> Self {
        self.validation_method = Some(method);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn start_date(mut self, date: impl Into<Timestamp>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<Timestamp>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn include_price(mut self, include: bool) -> Self {
        self.include_price = include;
        self
    }

    pub fn include_tokens(mut self, include: bool) -> Self {
        self.include_tokens = include;
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Add exchange names. A comma list adds several; blank names are ignored.
    pub fn exchange(mut self, exchange: impl AsRef<str>) -> Self {
        self.exchange.extend(split_list(exchange.as_ref()));
        self
    }

    pub fn sort_type(mut self, sort_type: impl Into<String>) -> Self {
        self.sort_type = Some(sort_type.into());
        self
    }

    pub fn address_type(mut self, address_type: impl Into<String>) -> Self {
        self.address_type = Some(address_type.into());
        self
    }

    pub fn block_number(mut self, block_number: impl ToString) -> Self {
        self.block_number = Some(block_number.to_string());
        self
    }

    pub fn quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }

    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// True when a date range was requested.
    pub fn is_historical(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Enrichment currency, defaulting to `usd`.
    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Copy with the enrichment flags cleared, for primary requests whose
    /// enrichment is performed locally.
    pub fn without_enrichment(&self) -> Self {
        Self {
            include_price: false,
            include_tokens: false,
            currency: None,
            ..self.clone()
        }
    }

    // ── Encoding ─────────────────────────────────────────────────────

    /// Encode set fields 1:1 as query parameters.
    pub fn to_params(&self) -> QueryParams {
        let mut q = QueryParams::new();
        if let Some(v) = self.time_format {
            q.insert(PARAM_TIME_FORMAT, v.as_str());
        }
        if let Some(v) = self.validation_method {
            q.insert(PARAM_VALIDATION_METHOD, v.as_str());
        }
        if let Some(v) = self.page {
            q.insert(PARAM_PAGE, v.to_string());
        }
        if let Some(v) = self.size {
            q.insert(PARAM_SIZE, v.to_string());
        }
        if let Some(v) = &self.start_date {
            q.insert(PARAM_START_DATE, v.to_param());
        }
        if let Some(v) = &self.end_date {
            q.insert(PARAM_END_DATE, v.to_param());
        }
        if self.include_price {
            q.insert(PARAM_INCLUDE_PRICE, "true");
        }
        if self.include_tokens {
            q.insert(PARAM_INCLUDE_TOKENS, "true");
        }
        if let Some(v) = &self.currency {
            q.insert(PARAM_CURRENCY, v.as_str());
        }
        if !self.exchange.is_empty() {
            q.insert(PARAM_EXCHANGE, self.exchange.join(","));
        }
        if let Some(v) = &self.sort_type {
            q.insert(PARAM_SORT_TYPE, v.as_str());
        }
        if let Some(v) = &self.address_type {
            q.insert(PARAM_TYPE, v.as_str());
        }
        if let Some(v) = &self.block_number {
            q.insert(PARAM_BLOCK_NUMBER, v.as_str());
        }
        if let Some(v) = &self.quote {
            q.insert(PARAM_QUOTE, v.as_str());
        }
        if let Some(v) = &self.direction {
            q.insert(PARAM_DIRECTION, v.as_str());
        }
        q
    }

    /// Decode a parameter set produced by [`to_params`](Self::to_params).
    /// Unknown keys and malformed values are rejected.
    pub fn from_params(params: &QueryParams) -> Web3DataResult<Self> {
        let mut opts = Self::default();
        for (key, value) in params.iter() {
            match key {
                PARAM_TIME_FORMAT => opts.time_format = Some(value.parse()?),
                PARAM_VALIDATION_METHOD => opts.validation_method = Some(value.parse()?),
                PARAM_PAGE => opts.page = Some(parse_number(key, value)?),
                PARAM_SIZE => opts.size = Some(parse_number(key, value)?),
                PARAM_START_DATE => opts.start_date = Some(Timestamp::from_param(value)),
                PARAM_END_DATE => opts.end_date = Some(Timestamp::from_param(value)),
                PARAM_INCLUDE_PRICE => opts.include_price = parse_bool(key, value)?,
                PARAM_INCLUDE_TOKENS => opts.include_tokens = parse_bool(key, value)?,
                PARAM_CURRENCY => opts.currency = Some(value.to_string()),
                PARAM_EXCHANGE => {
                    opts.exchange = split_list(value).collect();
                }
                PARAM_SORT_TYPE => opts.sort_type = Some(value.to_string()),
                PARAM_TYPE => opts.address_type = Some(value.to_string()),
                PARAM_BLOCK_NUMBER => opts.block_number = Some(value.to_string()),
                PARAM_QUOTE => opts.quote = Some(value.to_string()),
                PARAM_DIRECTION => opts.direction = Some(value.to_string()),
                unknown => {
                    return Err(Web3DataError::InvalidOption(format!("unknown option '{unknown}'")))
                }
            }
        }
        Ok(opts)
    }

    /// Parse a JSON options object (camelCase keys).
    pub fn from_json_str(s: &str) -> Web3DataResult<Self> {
        serde_json::from_str(s).map_err(|e| Web3DataError::InvalidOption(e.to_string()))
    }
}

fn parse_number(key: &str, value: &str) -> Web3DataResult<u32> {
    value
        .parse()
        .map_err(|_| Web3DataError::InvalidOption(format!("{key}={value}")))
}

fn parse_bool(key: &str, value: &str) -> Web3DataResult<bool> {
    value
        .parse()
        .map_err(|_| Web3DataError::InvalidOption(format!("{key}={value}")))
}
