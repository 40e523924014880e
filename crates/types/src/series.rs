//! Response shapes: latest snapshot versus historical series.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::Timestamp;

/// Description of a historical series: column names plus the range served.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// `{metadata, data}` envelope returned when a date range is requested.
///
/// `data` is usually an ordered list of rows; a few endpoints (order
/// snapshots) return an object instead, hence the type parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Historical<D = Vec<Value>> {
    #[serde(default)]
    pub metadata: Metadata,
    pub data: D,
}

impl Historical<Vec<Value>> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values of one column, for tabular rows (`[v0, v1, ...]`) or keyed
    /// rows (`{column: v}`).
    pub fn column(&self, name: &str) -> Vec<&Value> {
        let index = self.metadata.column_index(name);
        self.data
            .iter()
            .filter_map(|row| match row {
                Value::Array(cells) => index.and_then(|i| cells.get(i)),
                Value::Object(fields) => fields.get(name),
                _ => None,
            })
            .collect()
    }
}

/// Either the latest snapshot or a historical series, chosen by whether the
/// request carried `startDate`/`endDate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series<L, D = Vec<Value>> {
    Latest(L),
    Historical(Historical<D>),
}

impl<L, D> Series<L, D> {
    pub fn is_historical(&self) -> bool {
        matches!(self, Series::Historical(_))
    }

    pub fn latest(&self) -> Option<&L> {
        match self {
            Series::Latest(l) => Some(l),
            Series::Historical(_) => None,
        }
    }

    pub fn historical(&self) -> Option<&Historical<D>> {
        match self {
            Series::Latest(_) => None,
            Series::Historical(h) => Some(h),
        }
    }

    pub fn into_latest(self) -> Option<L> {
        match self {
            Series::Latest(l) => Some(l),
            Series::Historical(_) => None,
        }
    }

    pub fn into_historical(self) -> Option<Historical<D>> {
        match self {
            Series::Latest(_) => None,
            Series::Historical(h) => Some(h),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Historical {
        serde_json::from_value(json!({
            "metadata": {
                "columns": ["timestamp", "price", "volume"],
                "startDate": 1571011200000_i64,
                "endDate": 1571097600000_i64,
                "requestedTimestamp": 1571100000000_i64
            },
            "data": [
                [1571011200000_i64, "180.1", "10"],
                [1571014800000_i64, "181.4", "12"]
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_metadata_columns_and_extra() {
        let h = sample();
        assert!(h.metadata.has_column("price"));
        assert_eq!(h.metadata.column_index("volume"), Some(2));
        assert!(h.metadata.extra.contains_key("requestedTimestamp"));
        assert_eq!(h.metadata.start_date, Some(Timestamp::Millis(1571011200000)));
    }

    #[test]
    fn test_column_from_tabular_rows() {
        let h = sample();
        let prices: Vec<_> = h.column("price").into_iter().cloned().collect();
        assert_eq!(prices, vec![json!("180.1"), json!("181.4")]);
    }

    #[test]
    fn test_column_from_keyed_rows() {
        let h: Historical = serde_json::from_value(json!({
            "metadata": { "columns": ["price"] },
            "data": [{ "price": 1 }, { "price": 2 }]
        }))
        .unwrap();
        assert_eq!(h.column("price").len(), 2);
    }

    #[test]
    fn test_series_accessors() {
        let latest: Series<u32> = Series::Latest(7);
        assert!(!latest.is_historical());
        assert_eq!(latest.latest(), Some(&7));

        let hist: Series<u32> = Series::Historical(sample());
        assert!(hist.is_historical());
        assert_eq!(hist.into_historical().map(|h| h.len()), Some(2));
    }

    #[test]
    fn test_series_serializes_untagged() {
        let latest: Series<Vec<u32>> = Series::Latest(vec![1, 2]);
        assert_eq!(serde_json::to_value(&latest).unwrap(), json!([1, 2]));
    }
}
