//! reqwest-backed [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use web3data_common::constants::{API_KEY_HEADER, BLOCKCHAIN_ID_HEADER};
use web3data_common::{Request, Transport, Web3DataError, Web3DataResult};
use web3data_types::ClientConfig;

/// Sends each request once to `base_url + path + query` with the API key
/// header attached.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Web3DataResult<Self> {
        if !config.has_api_key() {
            return Err(Web3DataError::ApiKeyMissing);
        }

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| Web3DataError::Config(format!("api_key: {e}")))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        if let Some(id) = &config.blockchain_id {
            let value = HeaderValue::from_str(id)
                .map_err(|e| Web3DataError::Config(format!("blockchain_id: {e}")))?;
            headers.insert(BLOCKCHAIN_ID_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Web3DataError::Config(format!("HTTP client: {e}")))?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| Web3DataError::Config(format!("base_url '{}': {e}", config.base_url)))?;

        Ok(Self { http, base_url })
    }

    /// Absolute URL for a request. The base may carry a path prefix
    /// (`/api/v2`), so the request path is appended rather than joined.
    pub fn url_for(&self, request: &Request) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{}", url.path().trim_end_matches('/'), request.path);
        url.set_path(&path);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &Request) -> Web3DataResult<Value> {
        let url = self.url_for(request);
        debug!(path = %request.path, params = request.query.len(), "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Web3DataError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Web3DataError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(path = %request.path, status = status.as_u16(), "request failed");
            return Err(Web3DataError::Http {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                }),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let body: Value = serde_json::from_str(&text)?;
        Ok(unwrap_envelope(body))
    }
}

/// `{status, title, description, payload}` → `payload`. Bodies without the
/// envelope are returned as-is.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut fields) if fields.contains_key("payload") => {
            fields.remove("payload").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Best-effort message from an error body.
fn error_message(text: &str) -> Option<String> {
    let body: Value = serde_json::from_str(text).ok()?;
    ["description", "message", "title"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
