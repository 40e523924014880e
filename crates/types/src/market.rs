//! Market data records: features, rankings, pair prices, order book views.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use web3data_common::Web3DataError;

use crate::time::Timestamp;

/// Sections of the `/market/features` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketFeature {
    Exchanges,
    Pairs,
    Ohlcv,
    Prices,
    Tickers,
    Trades,
    OrderBooks,
    Bbos,
}

impl MarketFeature {
    pub const ALL: [MarketFeature; 8] = [
        MarketFeature::Exchanges,
        MarketFeature::Pairs,
        MarketFeature::Ohlcv,
        MarketFeature::Prices,
        MarketFeature::Tickers,
        MarketFeature::Trades,
        MarketFeature::OrderBooks,
        MarketFeature::Bbos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarketFeature::Exchanges => "exchanges",
            MarketFeature::Pairs => "pairs",
            MarketFeature::Ohlcv => "ohlcv",
            MarketFeature::Prices => "prices",
            MarketFeature::Tickers => "tickers",
            MarketFeature::Trades => "trades",
            MarketFeature::OrderBooks => "order_books",
            MarketFeature::Bbos => "bbos",
        }
    }
}

impl fmt::Display for MarketFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketFeature {
    type Err = Web3DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Web3DataError::InvalidOption(format!("unknown market feature '{s}'")))
    }
}

/// Feature name → nested provider structure, exactly as served. Keyed by
/// the provider's name so features outside [`MarketFeature`] survive.
pub type MarketFeatures = BTreeMap<String, Value>;

/// Asset symbol → token contract address.
pub type AssetAddresses = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_in_price_daily: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    #[serde(default)]
    pub data: Vec<Ranking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One candle. Prices arrive as numbers or strings; both parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Exchange → latest candle.
pub type OhlcvLatest = BTreeMap<String, OhlcvBar>;

/// Order book snapshot sides. Row layout follows `metadata.columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSides {
    #[serde(default)]
    pub ask: Vec<Value>,
    #[serde(default)]
    pub bid: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Exchange → pair → best bid/offer.
pub type BboLatest = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, rename = "priceUSD", skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_usd: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VwapEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twap1m: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap1m: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pair → volume/time weighted prices.
pub type VwapLatest = BTreeMap<String, VwapEntry>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Exchange → latest ticker.
pub type TickerLatest = BTreeMap<String, Ticker>;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_feature_names() {
        assert_eq!(MarketFeature::from_str("order_books").unwrap(), MarketFeature::OrderBooks);
        assert!(MarketFeature::from_str("orderbooks").is_err());
        for f in MarketFeature::ALL {
            assert_eq!(f.as_str().parse::<MarketFeature>().unwrap(), f);
        }
    }

    #[test]
    fn test_features_map_keys() {
        let features: MarketFeatures = serde_json::from_value(json!({
            "pairs": { "btc_eur": {} },
            "tickers": { "gdax": { "btc_usd": {} } },
            "funding": {}
        }))
        .unwrap();
        assert_eq!(
            features.keys().collect::<Vec<_>>(),
            vec!["funding", "pairs", "tickers"]
        );
        assert!(features.contains_key(MarketFeature::Pairs.as_str()));
    }

    #[test]
    fn test_prices_accept_numbers_and_strings() {
        let latest: OhlcvLatest = serde_json::from_value(json!({
            "bitfinex": { "open": 0.0213, "close": "0.0215", "exchange": "bitfinex" }
        }))
        .unwrap();
        let bar = &latest["bitfinex"];
        assert_eq!(bar.open, Some(Decimal::from_str("0.0213").unwrap()));
        assert_eq!(bar.close, Some(Decimal::from_str("0.0215").unwrap()));
        assert!(bar.extra.contains_key("exchange"));
    }

    #[test]
    fn test_token_price_usd_rename() {
        let p: TokenPrice = serde_json::from_value(json!({
            "address": "0x0d8775f648430679a709e98d2b0cb6250d2887ef",
            "priceUSD": "0.1874"
        }))
        .unwrap();
        assert!(p.price_usd.is_some());
    }

    #[test]
    fn test_rankings() {
        let r: Rankings = serde_json::from_value(json!({
            "data": [{ "rank": 1, "changeInPriceDaily": "1.25", "uniqueAddresses": 10 }],
            "totalRecords": 100
        }))
        .unwrap();
        assert_eq!(r.data.len(), 1);
        assert_eq!(r.data[0].change_in_price_daily, Some(Decimal::new(125, 2)));
        assert_eq!(r.total_records, Some(100));
    }
}
