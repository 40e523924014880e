//! Lenient field deserializers.
//!
//! The provider renders many numeric fields as strings (`"7000000"`) and
//! some as JSON numbers depending on endpoint and `timeFormat`. These
//! helpers accept either.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number or string → `Option<String>`. `null` and a missing field are `None`.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Number, decimal string or `0x`-hex string → `Option<u64>`.
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("not an unsigned integer: {n}"))),
        Some(Value::String(s)) => parse_u64(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("not an unsigned integer: {s}"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected number or string, got {other}"
        ))),
    }
}

/// Parse a decimal or `0x`-prefixed hex integer.
pub fn parse_u64(s: &str) -> Option<u64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// Comma-separated names; blanks are dropped.
pub fn split_list(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(',').map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}

/// A single string or a sequence of strings → `Vec<String>`. Entries are
/// split on commas and blanks are dropped, matching [`split_list`].
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    };
    Ok(raw.iter().flat_map(|s| split_list(s)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string_or_number")]
        text: Option<String>,
        #[serde(default, deserialize_with = "opt_u64")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "one_or_many")]
        names: Vec<String>,
    }

    #[test]
    fn test_string_or_number_accepts_both() {
        let a: Probe = serde_json::from_str(r#"{"text": 7000000}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"text": "7000000"}"#).unwrap();
        assert_eq!(a.text.as_deref(), Some("7000000"));
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let p: Probe = serde_json::from_str(r#"{"count": null}"#).unwrap();
        assert!(p.text.is_none());
        assert!(p.count.is_none());
        assert!(p.names.is_empty());
    }

    #[test]
    fn test_u64_from_hex_and_decimal() {
        let p: Probe = serde_json::from_str(r#"{"count": "0x1f"}"#).unwrap();
        assert_eq!(p.count, Some(31));
        let p: Probe = serde_json::from_str(r#"{"count": "42"}"#).unwrap();
        assert_eq!(p.count, Some(42));
        assert!(serde_json::from_str::<Probe>(r#"{"count": "forty"}"#).is_err());
    }

    #[test]
    fn test_one_or_many() {
        let p: Probe = serde_json::from_str(r#"{"names": "gdax"}"#).unwrap();
        assert_eq!(p.names, vec!["gdax"]);
        let p: Probe = serde_json::from_str(r#"{"names": ["gdax", "bitstamp"]}"#).unwrap();
        assert_eq!(p.names, vec!["gdax", "bitstamp"]);
        let p: Probe = serde_json::from_str(r#"{"names": ["gdax,bitstamp", ""]}"#).unwrap();
        assert_eq!(p.names, vec!["gdax", "bitstamp"]);
    }
}
