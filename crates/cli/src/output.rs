//! JSON rendering for command results and errors.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use web3data_common::Web3DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (for piping to jq, scripts).
    Json,
    /// Pretty-printed JSON (for reading).
    JsonPretty,
}

pub fn to_string<T: Serialize>(format: OutputFormat, data: &T) -> Result<String> {
    let json = match format {
        OutputFormat::Json => serde_json::to_string(data)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(data)?,
    };
    Ok(json)
}

pub fn render<T: Serialize>(format: OutputFormat, data: &T) -> Result<()> {
    println!("{}", to_string(format, data)?);
    Ok(())
}

/// Error envelope on stderr: `{"ok": false, "error": {...}}`.
pub fn render_error(format: OutputFormat, err: &Web3DataError) {
    match to_string(format, &err.to_json()) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{err}"),
    }
}
