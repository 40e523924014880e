//! Deterministic in-memory [`Transport`] for tests and offline use.
//!
//! Responses are keyed by request signature (path plus sorted query), so
//! the same request shape always replays the same body. Every request that
//! reaches the transport is logged, including ones with no recording.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use web3data_common::{QueryParams, Request, Transport, Web3DataError, Web3DataResult};

use crate::http::unwrap_envelope;

#[derive(Debug, Clone)]
struct Recording {
    status: u16,
    body: Value,
}

/// One entry of a fixture file.
#[derive(Debug, Deserialize)]
struct FixtureEntry {
    path: String,
    #[serde(default)]
    query: QueryParams,
    #[serde(default = "ok_status")]
    status: u16,
    #[serde(default)]
    body: Value,
}

fn ok_status() -> u16 {
    200
}

#[derive(Debug, Default)]
pub struct FixtureTransport {
    recordings: HashMap<String, Recording>,
    log: Mutex<Vec<Request>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a 200 response. `body` may be the full provider envelope or
    /// the bare payload.
    pub fn with(mut self, request: Request, body: Value) -> Self {
        self.insert(request, 200, body);
        self
    }

    /// Record a non-2xx response.
    pub fn with_status(mut self, request: Request, status: u16, body: Value) -> Self {
        self.insert(request, status, body);
        self
    }

    pub fn insert(&mut self, request: Request, status: u16, body: Value) {
        self.recordings
            .insert(request.signature(), Recording { status, body });
    }

    /// Load `[{path, query, status, body}]`. `query` defaults to empty and
    /// `status` to 200.
    pub fn from_json(json: &str) -> Web3DataResult<Self> {
        let entries: Vec<FixtureEntry> = serde_json::from_str(json)?;
        let mut transport = Self::new();
        for entry in entries {
            let request = Request::new(&entry.path).query(entry.query);
            transport.insert(request, entry.status, entry.body);
        }
        Ok(transport)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Web3DataResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Web3DataError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Merge another fixture set; its recordings win on conflict.
    pub fn merge(mut self, other: FixtureTransport) -> Self {
        self.recordings.extend(other.recordings);
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().map(|log| log.len()).unwrap_or_default()
    }

    pub fn recording_count(&self) -> usize {
        self.recordings.len()
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn get(&self, request: &Request) -> Web3DataResult<Value> {
        if let Ok(mut log) = self.log.lock() {
            log.push(request.clone());
        }

        let signature = request.signature();
        debug!(%signature, "replay");
        let recording = self
            .recordings
            .get(&signature)
            .ok_or_else(|| Web3DataError::FixtureMissing(signature.clone()))?;

        if !(200..300).contains(&recording.status) {
            let message = recording
                .body
                .get("description")
                .or_else(|| recording.body.get("title"))
                .and_then(Value::as_str)
                .unwrap_or("recorded error")
                .to_string();
            return Err(Web3DataError::Http {
                status: recording.status,
                message,
            });
        }

        Ok(unwrap_envelope(recording.body.clone()))
    }
}
