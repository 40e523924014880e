use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use web3data_types::ClientConfig;

/// Dotfolder name under `$HOME`.
const DOTFOLDER: &str = ".web3data";

/// Config file inside the dotfolder.
const CONFIG_FILE: &str = "config.json";

/// Resolve the root path: `$HOME/.web3data/`.
pub fn root_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DOTFOLDER))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(root_dir()?.join(CONFIG_FILE))
}

/// Ensure the dotfolder exists and seed `config.json` with defaults.
/// Idempotent.
///
/// ```text
/// $HOME/.web3data/
/// └── config.json
/// ```
pub fn init_workspace() -> Result<PathBuf> {
    init_workspace_at(&root_dir()?)
}

pub fn init_workspace_at(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;
        info!("created directory: {}", root.display());
    }

    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        write_config(&path, &ClientConfig::default())?;
        info!("created default config: {}", path.display());
    }
    Ok(path)
}

/// Load the config file, then apply environment overrides. A missing file
/// yields defaults, so `WEB3DATA_API_KEY` alone is enough to run.
pub fn load_config() -> Result<ClientConfig> {
    Ok(load_config_from(&config_path()?)?.apply_env())
}

/// File contents only, no environment overlay.
pub fn load_config_from(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write the config back to disk.
pub fn save_config(config: &ClientConfig) -> Result<()> {
    let root = root_dir()?;
    fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create directory: {}", root.display()))?;
    write_config(&root.join(CONFIG_FILE), config)
}

fn write_config(path: &Path, config: &ClientConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
