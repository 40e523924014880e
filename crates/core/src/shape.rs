//! Response shaping: turn a decoded payload into the value a facade
//! returns, and merge enrichment data into single records.
//!
//! Shaping works on `serde_json::Value` so enrichment can be merged before
//! the typed decode. Helpers named `decode_*` produce typed results.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use web3data_common::constants::WEI_PER_ETHER_SCALE;
use web3data_common::{Web3DataError, Web3DataResult};
use web3data_types::address::{BalancePrice, PriceQuote};
use web3data_types::market::MarketFeatures;
use web3data_types::{Historical, MarketFeature, Series};

/// Keys under which list endpoints nest their rows.
const LIST_KEYS: [&str; 2] = ["records", "data"];

/// Null, `{}`, `[]` and `""` all mean "nothing there".
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Typed decode with the target type named in the error.
pub fn decode<T: DeserializeOwned>(value: Value) -> Web3DataResult<T> {
    serde_json::from_value(value).map_err(|e| {
        Web3DataError::Decode(format!("{}: {e}", std::any::type_name::<T>()))
    })
}

/// `None` for an empty payload, the decoded record otherwise.
pub fn decode_optional<T: DeserializeOwned>(value: Value) -> Web3DataResult<Option<T>> {
    if is_empty_payload(&value) {
        return Ok(None);
    }
    decode(value).map(Some)
}

/// Ordered rows of a list payload: a bare array, or the array under
/// `records`/`data`. Anything else yields no rows.
pub fn list_rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut fields) => LIST_KEYS
            .iter()
            .find_map(|k| match fields.remove(*k) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub fn decode_list<T: DeserializeOwned>(value: Value) -> Web3DataResult<Vec<T>> {
    list_rows(value).into_iter().map(decode).collect()
}

/// True when the payload already carries the `{metadata, data}` envelope.
fn has_series_envelope(value: &Value) -> bool {
    value.get("metadata").is_some() && value.get("data").is_some()
}

/// Decode a `{metadata, data}` payload. A bare row list (or a `records`
/// wrapper) is accepted and gets empty metadata.
pub fn decode_historical<D: DeserializeOwned>(value: Value) -> Web3DataResult<Historical<D>> {
    if has_series_envelope(&value) {
        return decode(value);
    }
    let rows = Value::Array(list_rows(value));
    Ok(Historical {
        metadata: Default::default(),
        data: decode(rows)?,
    })
}

/// Latest snapshot or historical series, chosen by the request.
pub fn decode_series<L, D>(value: Value, historical: bool) -> Web3DataResult<Series<L, D>>
where
    L: DeserializeOwned,
    D: DeserializeOwned,
{
    if historical {
        decode_historical(value).map(Series::Historical)
    } else {
        decode(value).map(Series::Latest)
    }
}

/// List endpoints: rows directly, or the full envelope for a date range.
pub fn decode_list_series<T: DeserializeOwned>(
    value: Value,
    historical: bool,
) -> Web3DataResult<Series<Vec<T>>> {
    if historical {
        decode_historical(value).map(Series::Historical)
    } else {
        decode_list(value).map(Series::Latest)
    }
}

// ── Keyed maps ──────────────────────────────────────────────────────

/// Records keyed by address, from either an object keyed by address or an
/// array of records that each carry `address`.
pub fn keyed_by_address(value: Value) -> Web3DataResult<Map<String, Value>> {
    match value {
        Value::Object(fields) if !LIST_KEYS.iter().any(|k| fields.contains_key(*k)) => Ok(fields),
        other => {
            let mut keyed = Map::new();
            for row in list_rows(other) {
                let address = row
                    .get("address")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Web3DataError::Decode("balance row without address".into()))?
                    .to_string();
                keyed.insert(address, row);
            }
            Ok(keyed)
        }
    }
}

/// Keep only the requested features, preserving nested structure. An empty
/// selection keeps every key the provider served, known or not.
pub fn select_features(value: Value, wanted: &[MarketFeature]) -> Web3DataResult<MarketFeatures> {
    let Value::Object(fields) = value else {
        return Err(Web3DataError::Decode("features payload is not an object".into()));
    };
    Ok(fields
        .into_iter()
        .filter(|(name, _)| wanted.is_empty() || wanted.iter().any(|f| f.as_str() == name.as_str()))
        .collect())
}

/// Keep only the requested keys of an object payload (asset symbols).
pub fn select_keys(value: Value, wanted: &[&str]) -> Web3DataResult<Map<String, Value>> {
    let Value::Object(fields) = value else {
        return Err(Web3DataError::Decode("expected an object payload".into()));
    };
    Ok(fields
        .into_iter()
        .filter(|(k, _)| wanted.is_empty() || wanted.contains(&k.as_str()))
        .collect())
}

// ── Enrichment ──────────────────────────────────────────────────────

/// Parse a decimal from a JSON number or numeric string.
pub fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        _ => None,
    }
}

/// Unit price of ether in `currency` from `/market/prices/eth/latest`,
/// which is keyed by pair (`eth_usd`).
pub fn ether_quote(prices: &Value, currency: &str) -> Web3DataResult<Decimal> {
    let pair = format!("eth_{}", currency.to_ascii_lowercase());
    prices
        .get(&pair)
        .and_then(|p| p.get("price"))
        .and_then(decimal_of)
        .ok_or_else(|| Web3DataError::Decode(format!("no {pair} price in market payload")))
}

/// Wei → ether, exact.
pub fn wei_to_ether(wei: &str) -> Web3DataResult<Decimal> {
    let mut amount = Decimal::from_str(wei)
        .map_err(|e| Web3DataError::Decode(format!("balance '{wei}': {e}")))?;
    amount
        .set_scale(amount.scale() + WEI_PER_ETHER_SCALE)
        .map_err(|e| Web3DataError::Decode(format!("balance '{wei}': {e}")))?;
    Ok(amount.normalize())
}

/// `{balance: {currency, quote, total}}` for a wei balance.
pub fn balance_price(wei: &str, quote: Decimal, currency: &str) -> Web3DataResult<BalancePrice> {
    let total = wei_to_ether(wei)?
        .checked_mul(quote)
        .ok_or_else(|| Web3DataError::Decode(format!("balance '{wei}' overflows at quote {quote}")))?;
    Ok(BalancePrice {
        balance: PriceQuote {
            currency: currency.to_string(),
            quote: Some(quote),
            total: Some(total.normalize()),
        },
    })
}

/// The wei balance of a single record: `balance`, else `balanceIn`.
pub fn wei_of(record: &Value) -> Option<String> {
    ["balance", "balanceIn"].iter().find_map(|k| match record.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Merge `price` into a record. A record without a balance is priced at 0.
pub fn merge_price(record: &mut Value, quote: Decimal, currency: &str) -> Web3DataResult<()> {
    let wei = wei_of(record).unwrap_or_else(|| "0".to_string());
    let price = balance_price(&wei, quote, currency)?;
    insert_field(record, "price", serde_json::to_value(price)?)
}

/// Merge the token list into a record as `tokens`.
pub fn merge_tokens(record: &mut Value, tokens: Value) -> Web3DataResult<()> {
    insert_field(record, "tokens", Value::Array(list_rows(tokens)))
}

fn insert_field(record: &mut Value, key: &str, value: Value) -> Web3DataResult<()> {
    match record {
        Value::Object(fields) => {
            fields.insert(key.to_string(), value);
            Ok(())
        }
        _ => Err(Web3DataError::Decode(format!("cannot attach '{key}' to a non-object payload"))),
    }
}

// ── Scalars ─────────────────────────────────────────────────────────

/// Unsigned integer from a number, decimal string or hex string.
pub fn u64_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => web3data_types::de::parse_u64(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_payloads() {
        assert!(is_empty_payload(&Value::Null));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!([])));
        assert!(!is_empty_payload(&json!({ "number": "1" })));
        assert!(!is_empty_payload(&json!(0)));
    }

    #[test]
    fn test_list_rows_accepts_all_layouts() {
        assert_eq!(list_rows(json!([1, 2])).len(), 2);
        assert_eq!(list_rows(json!({ "records": [1, 2, 3] })).len(), 3);
        assert_eq!(list_rows(json!({ "data": [1], "totalRecords": 1 })).len(), 1);
        assert!(list_rows(json!({ "other": [1] })).is_empty());
        assert!(list_rows(Value::Null).is_empty());
    }

    #[test]
    fn test_decode_series_by_request() {
        let latest: Series<Value> = decode_series(json!({ "price": "1" }), false).unwrap();
        assert!(!latest.is_historical());

        let hist: Series<Value> = decode_series(
            json!({ "metadata": { "columns": ["timestamp", "price"] }, "data": [[1, "2"]] }),
            true,
        )
        .unwrap();
        let hist = hist.into_historical().unwrap();
        assert_eq!(hist.metadata.columns, vec!["timestamp", "price"]);
        assert_eq!(hist.len(), 1);
    }

    #[test]
    fn test_historical_from_bare_rows() {
        let h: Historical = decode_historical(json!({ "records": [{ "a": 1 }, { "a": 2 }] })).unwrap();
        assert!(h.metadata.columns.is_empty());
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_keyed_by_address() {
        let keyed = keyed_by_address(json!({ "0xa": { "balance": "1" } })).unwrap();
        assert!(keyed.contains_key("0xa"));

        let keyed = keyed_by_address(json!([
            { "address": "0xa", "balance": "1" },
            { "address": "0xb", "balance": "2" }
        ]))
        .unwrap();
        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed["0xb"]["balance"], "2");

        assert!(keyed_by_address(json!([{ "balance": "1" }])).is_err());
    }

    #[test]
    fn test_select_features_exact_subset() {
        let all = json!({
            "exchanges": {}, "pairs": { "btc_eur": {} }, "tickers": { "gdax": {} }, "ohlcv": {}
        });
        let picked = select_features(all.clone(), &[MarketFeature::Pairs, MarketFeature::Tickers]).unwrap();
        assert_eq!(picked.len(), 2);
        assert_eq!(picked["pairs"], json!({ "btc_eur": {} }));

        assert_eq!(select_features(all, &[]).unwrap().len(), 4);
    }

    #[test]
    fn test_select_all_features_keeps_unknown_keys() {
        let all = json!({ "pairs": {}, "funding": { "gdax": {} } });
        let everything = select_features(all.clone(), &[]).unwrap();
        assert_eq!(everything.keys().collect::<Vec<_>>(), vec!["funding", "pairs"]);

        let picked = select_features(all, &[MarketFeature::Pairs]).unwrap();
        assert_eq!(picked.keys().collect::<Vec<_>>(), vec!["pairs"]);
    }

    #[test]
    fn test_select_keys() {
        let picked = select_keys(json!({ "bat": "0x1", "rep": "0x2", "zrx": "0x3" }), &["bat", "rep"]).unwrap();
        assert_eq!(picked.len(), 2);
        assert!(!picked.contains_key("zrx"));
    }

    #[test]
    fn test_wei_to_ether_is_exact() {
        assert_eq!(wei_to_ether("1500000000000000000").unwrap(), Decimal::from_str("1.5").unwrap());
        assert_eq!(wei_to_ether("1").unwrap(), Decimal::from_str("0.000000000000000001").unwrap());
        assert!(wei_to_ether("lots").is_err());
    }

    #[test]
    fn test_merge_price() {
        let mut record = json!({ "balanceIn": "2000000000000000000" });
        merge_price(&mut record, Decimal::from_str("180.25").unwrap(), "usd").unwrap();
        assert_eq!(record["price"]["balance"]["currency"], "usd");
        assert_eq!(record["price"]["balance"]["total"], "360.5");
        assert_eq!(record["price"]["balance"]["quote"], "180.25");
    }

    #[test]
    fn test_ether_quote() {
        let prices = json!({ "eth_usd": { "price": "181.37", "volume": "1" } });
        assert_eq!(ether_quote(&prices, "usd").unwrap(), Decimal::from_str("181.37").unwrap());
        assert!(ether_quote(&prices, "eur").is_err());

        let numeric = json!({ "eth_usd": { "price": 181.37 } });
        assert_eq!(ether_quote(&numeric, "USD").unwrap(), Decimal::from_str("181.37").unwrap());
    }

    #[test]
    fn test_merge_tokens() {
        let mut record = json!({ "balance": "1" });
        merge_tokens(&mut record, json!({ "records": [{ "symbol": "BAT" }] })).unwrap();
        assert_eq!(record["tokens"][0]["symbol"], "BAT");
        assert!(merge_tokens(&mut json!([]), json!([])).is_err());
    }

    #[test]
    fn test_u64_of() {
        assert_eq!(u64_of(&json!(115)), Some(115));
        assert_eq!(u64_of(&json!("115")), Some(115));
        assert_eq!(u64_of(&json!("0x73")), Some(115));
        assert_eq!(u64_of(&Value::Null), None);
    }
}
