//! Block resource records and the block identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de::{opt_string_or_number, opt_u64, parse_u64};
use crate::time::Timestamp;

/// A block is addressed by number or by hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    Number(u64),
    Hash(String),
}

impl BlockId {
    /// An empty hash is the only way to spell "no identifier".
    pub fn is_empty(&self) -> bool {
        matches!(self, BlockId::Hash(h) if h.is_empty())
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            BlockId::Number(n) => Some(*n),
            BlockId::Hash(_) => None,
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Number(n) => write!(f, "{n}"),
            BlockId::Hash(h) => f.write_str(h),
        }
    }
}

impl From<u64> for BlockId {
    fn from(n: u64) -> Self {
        BlockId::Number(n)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId::from(s.as_str())
    }
}

impl FromStr for BlockId {
    type Err = std::convert::Infallible;

    /// All-digit input is a number; anything else (including `0x…`) a hash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse() {
                return Ok(BlockId::Number(n));
            }
        }
        Ok(BlockId::Hash(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "opt_u64", skip_serializing_if = "Option::is_none")]
    pub num_transactions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn number_u64(&self) -> Option<u64> {
        self.number.as_deref().and_then(parse_u64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uncle {
    /// Number of the block that includes the uncle.
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "opt_u64", skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Uncle {
    pub fn block_number_u64(&self) -> Option<u64> {
        self.block_number.as_deref().and_then(parse_u64)
    }
}
