//! Error taxonomy for every web3data operation.
//!
//! Structured error model. Every error carries:
//! - **code**: machine-readable error code (e.g. `NO_ADDRESS`)
//! - **category**: error class (`validation`, `network`, `decode`, `config`, `system`)
//! - **message**: the user-visible `Display` string
//!
//! JSON output format:
//! ```json
//! {
//!   "ok": false,
//!   "error": {
//!     "code": "NO_ADDRESS",
//!     "message": "No address hash",
//!     "category": "validation"
//!   }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::constants::{
    ERROR_MESSAGE_ADDRESS_NO_ADDRESS, ERROR_MESSAGE_BLOCK_NO_ID, ERROR_MESSAGE_MARKET_NO_EXCHANGE,
    ERROR_MESSAGE_MARKET_NO_PAIR,
};

/// Error category; determines the exit code.
///
/// Exit codes:
/// - `0`: success
/// - `1`: caller error (validation, config)
/// - `2`: network error
/// - `3`: decode / system error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Validation,
    Config,
    Network,
    Decode,
    System,
}

impl ErrorCategory {
    /// Process exit code for this category.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Validation => 1,
            ErrorCategory::Config => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Decode => 3,
            ErrorCategory::System => 3,
        }
    }
}

/// Structured error detail for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub category: ErrorCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Top-level error type for all web3data operations.
#[derive(Debug, Error)]
pub enum Web3DataError {
    // ── Validation (raised before any request is sent) ───────────────
    #[error("{}", ERROR_MESSAGE_ADDRESS_NO_ADDRESS)]
    NoAddress,

    #[error("{}", ERROR_MESSAGE_BLOCK_NO_ID)]
    NoBlockId,

    #[error("{}", ERROR_MESSAGE_MARKET_NO_PAIR)]
    NoPair,

    #[error("{}", ERROR_MESSAGE_MARKET_NO_EXCHANGE)]
    NoExchange,

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    // ── Network ─────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Decode ──────────────────────────────────────────────────────
    #[error("Decode error: {0}")]
    Decode(String),

    // ── Config ──────────────────────────────────────────────────────
    #[error("API key missing")]
    ApiKeyMissing,

    #[error("Configuration error: {0}")]
    Config(String),

    // ── System ──────────────────────────────────────────────────────
    #[error("No recorded response for {0}")]
    FixtureMissing(String),
}

impl Web3DataError {
    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Web3DataError::NoAddress => "NO_ADDRESS",
            Web3DataError::NoBlockId => "NO_BLOCK_ID",
            Web3DataError::NoPair => "NO_PAIR",
            Web3DataError::NoExchange => "NO_EXCHANGE",
            Web3DataError::InvalidOption(_) => "INVALID_OPTION",
            Web3DataError::Network(_) => "NETWORK_ERROR",
            Web3DataError::Http { .. } => "HTTP_ERROR",
            Web3DataError::Decode(_) => "DECODE_ERROR",
            Web3DataError::ApiKeyMissing => "API_KEY_MISSING",
            Web3DataError::Config(_) => "CONFIG_ERROR",
            Web3DataError::FixtureMissing(_) => "FIXTURE_MISSING",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Web3DataError::NoAddress
            | Web3DataError::NoBlockId
            | Web3DataError::NoPair
            | Web3DataError::NoExchange
            | Web3DataError::InvalidOption(_) => ErrorCategory::Validation,
            Web3DataError::Network(_) | Web3DataError::Http { .. } => ErrorCategory::Network,
            Web3DataError::Decode(_) => ErrorCategory::Decode,
            Web3DataError::ApiKeyMissing | Web3DataError::Config(_) => ErrorCategory::Config,
            Web3DataError::FixtureMissing(_) => ErrorCategory::System,
        }
    }

    /// True for the "required identifier was empty" family.
    pub fn is_missing_identifier(&self) -> bool {
        matches!(
            self,
            Web3DataError::NoAddress
                | Web3DataError::NoBlockId
                | Web3DataError::NoPair
                | Web3DataError::NoExchange
        )
    }

    /// HTTP 404 from the provider.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Web3DataError::Http { status: 404, .. })
    }

    /// Get the structured error detail for JSON output.
    pub fn detail(&self) -> ErrorDetail {
        let status = match self {
            Web3DataError::Http { status, .. } => Some(*status),
            _ => None,
        };
        ErrorDetail {
            code: self.code().into(),
            message: self.to_string(),
            category: self.category(),
            status,
        }
    }

    /// Exit code: 0 success, 1 caller error, 2 network, 3 decode/system.
    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    /// Serialize this error as the JSON error envelope.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": false,
            "error": self.detail(),
        })
    }
}

impl From<serde_json::Error> for Web3DataError {
    fn from(e: serde_json::Error) -> Self {
        Web3DataError::Decode(e.to_string())
    }
}

pub type Web3DataResult<T> = Result<T, Web3DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identifier_messages() {
        assert_eq!(Web3DataError::NoAddress.to_string(), "No address hash");
        assert_eq!(Web3DataError::NoBlockId.to_string(), "No Block number or hash");
        assert_eq!(Web3DataError::NoPair.to_string(), "No market pair");
        assert_eq!(Web3DataError::NoExchange.to_string(), "No exchange specified");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Web3DataError::NoAddress.exit_code(), 1);
        assert_eq!(Web3DataError::Network("timeout".into()).exit_code(), 2);
        assert_eq!(
            Web3DataError::Http { status: 500, message: "boom".into() }.exit_code(),
            2
        );
        assert_eq!(Web3DataError::Decode("bad".into()).exit_code(), 3);
        assert_eq!(Web3DataError::ApiKeyMissing.exit_code(), 1);
    }

    #[test]
    fn test_error_json_format() {
        let err = Web3DataError::Http { status: 404, message: "Not Found".into() };
        let json = err.to_json();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "HTTP_ERROR");
        assert_eq!(json["error"]["category"], "network");
        assert_eq!(json["error"]["status"], 404);
    }

    #[test]
    fn test_status_omitted_for_non_http() {
        let serialized = serde_json::to_string(&Web3DataError::NoPair.detail()).unwrap();
        assert!(!serialized.contains("\"status\""));
    }

    #[test]
    fn test_classification_helpers() {
        assert!(Web3DataError::NoExchange.is_missing_identifier());
        assert!(!Web3DataError::Decode("x".into()).is_missing_identifier());
        assert!(Web3DataError::Http { status: 404, message: String::new() }.is_not_found());
        assert!(!Web3DataError::Http { status: 500, message: String::new() }.is_not_found());
    }

    #[test]
    fn test_serde_error_maps_to_decode() {
        let err: Web3DataError = serde_json::from_str::<u64>("\"nope\"").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Decode);
    }
}
