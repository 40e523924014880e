use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time as the provider renders it: epoch milliseconds when
/// `timeFormat=ms`, an ISO-8601 string when `timeFormat=iso`.
///
/// Also used for `startDate`/`endDate` request bounds, which accept either.
/// All-digit text is always `Millis`, whether built from a string or
/// deserialized, so `Iso` never renders as a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawTimestamp")]
pub enum Timestamp {
    Millis(i64),
    Iso(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl From<RawTimestamp> for Timestamp {
    fn from(raw: RawTimestamp) -> Self {
        match raw {
            RawTimestamp::Millis(ms) => Timestamp::Millis(ms),
            RawTimestamp::Text(s) => Timestamp::from_param(&s),
        }
    }
}

impl Timestamp {
    /// Query-string rendering.
    pub fn to_param(&self) -> String {
        match self {
            Timestamp::Millis(ms) => ms.to_string(),
            Timestamp::Iso(s) => s.clone(),
        }
    }

    /// Inverse of [`to_param`](Self::to_param): all-digit values are millis.
    pub fn from_param(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(ms) => Timestamp::Millis(ms),
            Err(_) => Timestamp::Iso(s.to_string()),
        }
    }

    pub fn is_iso(&self) -> bool {
        matches!(self, Timestamp::Iso(_))
    }

    /// Resolve to a UTC instant. ISO values must be RFC 3339.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Timestamp::Iso(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Millis(ms)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::from_param(s)
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Timestamp::from_param(&s)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Millis(dt.timestamp_millis())
    }
}
