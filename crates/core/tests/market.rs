//! Market facade against recorded provider responses.

use std::sync::Arc;

use web3data_common::Web3DataError;
use web3data_core::{FixtureTransport, Web3Data};
use web3data_types::{MarketFeature, QueryOptions, TimeFormat};

const BAT: &str = "0x0d8775f648430679a709e98d2b0cb6250d2887ef";
const START: i64 = 1571011200000;
const END: i64 = 1571097600000;

fn client() -> (Web3Data, Arc<FixtureTransport>) {
    let transport = Arc::new(
        FixtureTransport::from_json(include_str!("fixtures/market.json")).expect("fixture file"),
    );
    (Web3Data::with_transport(transport.clone()), transport)
}

fn range() -> QueryOptions {
    QueryOptions::new().start_date(START).end_date(END)
}

#[tokio::test]
async fn test_pair_methods_reject_empty_pair() {
    let (client, transport) = client();
    let api = client.market();
    let opts = QueryOptions::default();

    let errors = vec![
        api.get_ohlcv("", &opts).await.err(),
        api.get_orders("", &["gdax"], &opts).await.err(),
        api.get_bbos("", &opts).await.err(),
        api.get_prices("", &opts).await.err(),
        api.get_token_prices("", &opts).await.err(),
        api.get_vwap("", &opts).await.err(),
        api.get_tickers("", &opts).await.err(),
        api.get_trades("", &opts).await.err(),
        api.get_order_books("", &opts).await.err(),
    ];
    for err in errors {
        let err = err.expect("empty pair must fail");
        assert!(matches!(err, Web3DataError::NoPair));
        assert_eq!(err.to_string(), "No market pair");
    }
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_orders_require_exchange() {
    let (client, transport) = client();
    let opts = QueryOptions::default();
    let api = client.market();

    let none: [&str; 0] = [];
    assert!(matches!(
        api.get_orders("eth_btc", &none, &opts).await,
        Err(Web3DataError::NoExchange)
    ));
    assert!(matches!(
        api.get_orders("eth_btc", &["", ""], &opts).await,
        Err(Web3DataError::NoExchange)
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_ether_price() {
    let (client, _) = client();
    let price = client.market().get_ether_price().await.unwrap();
    assert_eq!(price.to_string(), "180.40");
}

#[tokio::test]
async fn test_rankings() {
    let (client, _) = client();
    let rankings = client
        .market()
        .get_rankings(&QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(rankings.total_records, Some(2));
    assert_eq!(rankings.data[0].rank, Some(1));
    assert_eq!(rankings.data[1].symbol.as_deref(), Some("BAT"));
    assert!(rankings.data[1].change_in_price_daily.unwrap().is_sign_negative());
}

#[tokio::test]
async fn test_rankings_sorted() {
    let (client, transport) = client();
    let rankings = client
        .market()
        .get_rankings(&QueryOptions::new().sort_type("uniqueAddresses"))
        .await
        .unwrap();
    assert!(rankings.data[0].extra.contains_key("uniqueAddresses"));
    assert_eq!(
        transport.requests()[0].query.get("sortType"),
        Some("uniqueAddresses")
    );
}

#[tokio::test]
async fn test_all_features() {
    let (client, _) = client();
    let features = client
        .market()
        .get_features(&[], &QueryOptions::default())
        .await
        .unwrap();
    // Every served key survives, including ones without a typed variant.
    assert_eq!(features.len(), MarketFeature::ALL.len() + 1);
    assert!(features.contains_key(MarketFeature::OrderBooks.as_str()));
    assert!(features.contains_key("funding"));
}

#[tokio::test]
async fn test_selected_features_only() {
    let (client, transport) = client();
    let features = client
        .market()
        .get_features(
            &[MarketFeature::Pairs, MarketFeature::Tickers],
            &QueryOptions::default(),
        )
        .await
        .unwrap();
    let keys: Vec<_> = features.keys().collect();
    assert_eq!(keys, vec!["pairs", "tickers"]);
    assert!(features["pairs"].get("eth_btc").is_some());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_features_by_exchange() {
    let (client, _) = client();
    let features = client
        .market()
        .get_features(&[MarketFeature::Ohlcv], &QueryOptions::new().exchange("gdax"))
        .await
        .unwrap();
    assert_eq!(features.len(), 1);
    assert!(features["ohlcv"].get("gdax").is_some());
}

#[tokio::test]
async fn test_ohlcv_latest() {
    let (client, _) = client();
    let latest = client
        .market()
        .get_ohlcv("eth_btc", &QueryOptions::default())
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert_eq!(latest.len(), 2);
    // Strings and numbers both decode.
    assert!(latest["bitfinex"].close.is_some());
    assert_eq!(latest["gdax"].close.map(|c| c.to_string()), Some("0.02143".to_string()));
}

#[tokio::test]
async fn test_ohlcv_single_exchange() {
    let (client, _) = client();
    let latest = client
        .market()
        .get_ohlcv("eth_btc", &QueryOptions::new().exchange("bitfinex"))
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert_eq!(latest.keys().collect::<Vec<_>>(), vec!["bitfinex"]);
}

#[tokio::test]
async fn test_ohlcv_historical() {
    let (client, transport) = client();
    let history = client
        .market()
        .get_ohlcv("eth_btc", &range())
        .await
        .unwrap()
        .into_historical()
        .unwrap();
    assert!(history.metadata.has_column("close"));
    assert!(history.metadata.start_date.is_some());
    assert_eq!(transport.requests()[0].path, "/market/ohlcv/eth_btc/historical");
}

#[tokio::test]
async fn test_orders_single_exchange() {
    let (client, _) = client();
    let orders = client
        .market()
        .get_orders("eth_btc", &["gdx"], &QueryOptions::default())
        .await
        .unwrap();
    assert!(orders.metadata.has_column("numOrders"));
    assert_eq!(orders.data.ask.len(), 2);
    assert_eq!(orders.data.bid.len(), 1);
}

#[tokio::test]
async fn test_orders_multiple_exchanges_iso() {
    let (client, transport) = client();
    let orders = client
        .market()
        .get_orders(
            "eth_btc",
            &["gdx", "bitstamp"],
            &QueryOptions::new().time_format(TimeFormat::Iso),
        )
        .await
        .unwrap();
    assert_eq!(
        orders.metadata.extra.get("requestedTimestamp").and_then(|v| v.as_str()),
        Some("2019-10-15T00:00:00.000Z")
    );
    assert_eq!(transport.requests()[0].query.get("exchange"), Some("gdx,bitstamp"));
}

#[tokio::test]
async fn test_bbos() {
    let (client, _) = client();
    let latest = client
        .market()
        .get_bbos("eth_btc", &QueryOptions::default())
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert!(latest["gdax"].contains_key("eth_btc"));

    let history = client
        .market()
        .get_bbos(
            "eth_btc",
            &QueryOptions::new().start_date(1583708400000_i64).end_date(1583712000000_i64),
        )
        .await
        .unwrap()
        .into_historical()
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.column("askPrice").len(), 2);
}

#[tokio::test]
async fn test_prices() {
    let (client, _) = client();
    let latest = client
        .market()
        .get_prices("eth_usd", &QueryOptions::default())
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert_eq!(latest.price.map(|p| p.to_string()), Some("180.40".to_string()));

    let history = client
        .market()
        .get_prices("eth_usd", &range())
        .await
        .unwrap()
        .into_historical()
        .unwrap();
    assert_eq!(history.column("price").len(), 2);
}

#[tokio::test]
async fn test_token_prices() {
    let (client, _) = client();
    let latest = client
        .market()
        .get_token_prices(BAT, &QueryOptions::default())
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].address.as_deref(), Some(BAT));
    assert!(latest[0].price_usd.is_some());

    let history = client
        .market()
        .get_token_prices(BAT, &range())
        .await
        .unwrap()
        .into_historical()
        .unwrap();
    assert!(history.metadata.has_column("priceUSD"));
}

#[tokio::test]
async fn test_vwap() {
    let (client, _) = client();
    let all = client
        .market()
        .get_vwap("eth", &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all["eth_btc"].vwap1m.is_some());

    let usd = client
        .market()
        .get_vwap("eth", &QueryOptions::new().quote("usd"))
        .await
        .unwrap();
    assert_eq!(usd.keys().collect::<Vec<_>>(), vec!["eth_usd"]);
    assert!(usd["eth_usd"].twap1m.is_some());
}

#[tokio::test]
async fn test_tickers() {
    let (client, _) = client();
    let latest = client
        .market()
        .get_tickers("eth_btc", &QueryOptions::default())
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest["bitfinex"].bid.is_some());

    let gdax = client
        .market()
        .get_tickers("eth_btc", &QueryOptions::new().exchange("gdax"))
        .await
        .unwrap()
        .into_latest()
        .unwrap();
    assert_eq!(gdax.len(), 1);

    let history = client
        .market()
        .get_tickers("eth_btc", &range())
        .await
        .unwrap()
        .into_historical()
        .unwrap();
    assert_eq!(history.column("mid").len(), 1);
}

#[tokio::test]
async fn test_trades() {
    let (client, _) = client();
    let trades = client
        .market()
        .get_trades("eth_usd", &QueryOptions::default())
        .await
        .unwrap();
    assert!(trades.metadata.has_column("isBuy"));
    assert_eq!(trades.len(), 1);

    let bitstamp = client
        .market()
        .get_trades("eth_usd", &QueryOptions::new().exchange("bitstamp"))
        .await
        .unwrap();
    assert_eq!(
        bitstamp.column("exchange"),
        vec![&serde_json::Value::from("bitstamp")]
    );
}

#[tokio::test]
async fn test_order_books() {
    let (client, transport) = client();
    let books = client
        .market()
        .get_order_books("btc_usd", &QueryOptions::new().exchange("gdax"))
        .await
        .unwrap();
    assert!(books.metadata.has_column("numOrders"));
    assert_eq!(
        transport.requests()[0].path,
        "/market/order-book-updates/btc_usd/historical"
    );
}

#[tokio::test]
async fn test_asset_addresses() {
    let (client, _) = client();
    let one = client
        .market()
        .get_asset_addresses(&["bat"], &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one["bat"], BAT);

    // Provider may return extra symbols; only the requested ones survive.
    let two = client
        .market()
        .get_asset_addresses(&["bat", "rep"], &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(two.keys().collect::<Vec<_>>(), vec!["bat", "rep"]);
}
