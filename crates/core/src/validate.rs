//! Required-identifier checks, run before any request is built.
//!
//! Identifiers pass through unchanged: no trimming, no case folding.

use web3data_common::{Web3DataError, Web3DataResult};
use web3data_types::BlockId;

pub fn require_address(hash: &str) -> Web3DataResult<&str> {
    require(hash, Web3DataError::NoAddress)
}

pub fn require_pair(pair: &str) -> Web3DataResult<&str> {
    require(pair, Web3DataError::NoPair)
}

/// At least one non-empty exchange name.
pub fn require_exchange<S: AsRef<str>>(exchanges: &[S]) -> Web3DataResult<Vec<&str>> {
    let names: Vec<&str> = exchanges
        .iter()
        .map(|e| e.as_ref())
        .filter(|e| !e.is_empty())
        .collect();
    if names.is_empty() {
        return Err(Web3DataError::NoExchange);
    }
    Ok(names)
}

pub fn require_block(id: &BlockId) -> Web3DataResult<&BlockId> {
    if id.is_empty() {
        return Err(Web3DataError::NoBlockId);
    }
    Ok(id)
}

/// Every address in a multi-address call must be present.
pub fn require_addresses<S: AsRef<str>>(hashes: &[S]) -> Web3DataResult<Vec<&str>> {
    if hashes.is_empty() {
        return Err(Web3DataError::NoAddress);
    }
    hashes.iter().map(|h| require_address(h.as_ref())).collect()
}

fn require(value: &str, missing: Web3DataError) -> Web3DataResult<&str> {
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value)
    }
}
