//! Transport seam: every facade talks to the network through this trait.
//!
//! The HTTP implementation lives in `web3data-core`; tests substitute a
//! deterministic fake that replays recorded payloads.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Web3DataResult;
use crate::request::Request;

/// Performs one GET and returns the decoded `payload` of the provider
/// envelope. Single attempt: no retry, no backoff.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &Request) -> Web3DataResult<serde_json::Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, request: &Request) -> Web3DataResult<serde_json::Value> {
        (**self).get(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, request: &Request) -> Web3DataResult<serde_json::Value> {
        (**self).get(request).await
    }
}
