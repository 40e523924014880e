use anyhow::{bail, Result};
use serde_json::json;
use tracing::info;
use web3data_core::workspace;

use crate::output::{render, OutputFormat};

/// `web3data config show`. The API key is redacted.
pub fn show(fmt: OutputFormat) -> Result<()> {
    let config = workspace::load_config()?;
    render(fmt, &config.redacted())
}

/// `web3data config init`
pub fn init(fmt: OutputFormat) -> Result<()> {
    let path = workspace::init_workspace()?;
    info!(path = %path.display(), "workspace ready");
    render(fmt, &json!({ "ok": true, "path": path.display().to_string() }))
}

/// `web3data config set <key> <value>`
pub fn set(key: &str, value: &str, fmt: OutputFormat) -> Result<()> {
    let path = workspace::config_path()?;
    let mut config = workspace::load_config_from(&path)?;
    match key {
        "api-key" | "api_key" => config.api_key = value.to_string(),
        "base-url" | "base_url" => config.base_url = value.to_string(),
        "blockchain-id" | "blockchain_id" => {
            config.blockchain_id = (!value.is_empty()).then(|| value.to_string())
        }
        "timeout" | "timeout_secs" => config.timeout_secs = value.parse()?,
        other => bail!("Unknown config key: {other}. Use api-key, base-url, blockchain-id or timeout"),
    }
    workspace::save_config(&config)?;
    info!(%key, path = %path.display(), "config updated");
    render(fmt, &config.redacted())
}
