use serde::{Deserialize, Serialize};
use web3data_common::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable overriding [`ClientConfig::api_key`].
pub const ENV_API_KEY: &str = "WEB3DATA_API_KEY";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "WEB3DATA_BASE_URL";
/// Environment variable overriding [`ClientConfig::blockchain_id`].
pub const ENV_BLOCKCHAIN_ID: &str = "WEB3DATA_BLOCKCHAIN_ID";

/// Client configuration stored in `$HOME/.web3data/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Sent verbatim as `x-api-key`. Never logged.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `x-amberdata-blockchain-id` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            blockchain_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_blockchain_id(mut self, blockchain_id: impl Into<String>) -> Self {
        self.blockchain_id = Some(blockchain_id.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Overlay values from the environment. Empty variables are ignored.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup (environment, test map).
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v: &String| !v.is_empty());
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(id) = get(ENV_BLOCKCHAIN_ID) {
            self.blockchain_id = Some(id);
        }
        self
    }

    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let n = self.api_key.chars().count();
        // Keys of four chars or fewer are masked entirely.
        let masked = if n <= 4 { n } else { n - 4 };
        let api_key = self
            .api_key
            .chars()
            .enumerate()
            .map(|(i, c)| if i < masked { '*' } else { c })
            .collect();
        Self {
            api_key,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "https://web3api.io/api/v2");
        assert_eq!(cfg.timeout_secs, 30);
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"api_key": "abc"}"#).unwrap();
        assert_eq!(cfg.api_key, "abc");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.blockchain_id.is_none());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEY, "from-env"),
            (ENV_BASE_URL, ""),
            (ENV_BLOCKCHAIN_ID, "ethereum-mainnet"),
        ]);
        let cfg = ClientConfig::new("from-file")
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api_key, "from-env");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.blockchain_id.as_deref(), Some("ethereum-mainnet"));
    }

    #[test]
    fn test_redacted() {
        let cfg = ClientConfig::new("UAK1234567890abcd");
        assert_eq!(cfg.redacted().api_key, "*************abcd");
        assert_eq!(ClientConfig::new("ab").redacted().api_key, "**");
        assert_eq!(ClientConfig::new("").redacted().api_key, "");
    }

    #[test]
    fn test_redacted_counts_chars_not_bytes() {
        assert_eq!(ClientConfig::new("xxxxxéabc").redacted().api_key, "*****éabc");
        assert_eq!(ClientConfig::new("ключ").redacted().api_key, "****");
    }
}
