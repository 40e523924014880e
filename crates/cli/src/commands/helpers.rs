//! Shared helpers for CLI commands.

use anyhow::Result;
use tracing::debug;
use web3data_core::{workspace, Web3Data};
use web3data_types::QueryOptions;

/// Parse the `--options` JSON object; absent means defaults.
pub fn parse_options(raw: Option<&str>) -> Result<QueryOptions> {
    Ok(raw
        .map(QueryOptions::from_json_str)
        .transpose()?
        .unwrap_or_default())
}

/// HTTP client from `~/.web3data/config.json` plus environment overrides.
pub fn client() -> Result<Web3Data> {
    let config = workspace::load_config()?;
    debug!(base_url = %config.base_url, has_key = config.has_api_key(), "loaded config");
    Ok(Web3Data::new(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use web3data_common::Web3DataError;
    use web3data_types::TimeFormat;

    #[test]
    fn test_parse_options() {
        assert_eq!(parse_options(None).unwrap(), QueryOptions::default());
        let opts = parse_options(Some(r#"{"timeFormat":"iso","size":5}"#)).unwrap();
        assert_eq!(opts.time_format, Some(TimeFormat::Iso));
        assert_eq!(opts.size, Some(5));
    }

    #[test]
    fn test_parse_options_rejects_unknown_keys() {
        let err = parse_options(Some(r#"{"bogus":1}"#)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Web3DataError>(),
            Some(Web3DataError::InvalidOption(_))
        ));
    }
}
