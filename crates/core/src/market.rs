//! Market facade.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use web3data_common::constants::{DEFAULT_CURRENCY, MARKET_ENDPOINT};
use web3data_common::{Request, Transport, Web3DataError, Web3DataResult};
use web3data_types::market::{
    AssetAddresses, BboLatest, MarketFeatures, OhlcvLatest, OrderSides, PairPrice, Rankings,
    TickerLatest, TokenPrice, VwapLatest,
};
use web3data_types::{Historical, MarketFeature, QueryOptions, Series};

use crate::address::ether_price_request;
use crate::shape;
use crate::validate::{require_exchange, require_pair};

/// Query parameter carrying the asset symbol list.
const PARAM_ASSETS: &str = "assets";

#[derive(Clone)]
pub struct MarketApi {
    transport: Arc<dyn Transport>,
}

impl MarketApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `/market/<resource>/<pair>[/latest|/historical]`.
    fn pair_request(resource: &str, pair: &str, suffix: Option<&str>, opts: &QueryOptions) -> Request {
        let mut request = Request::new(MARKET_ENDPOINT).segment(resource).segment(pair);
        if let Some(suffix) = suffix {
            request = request.segment(suffix);
        }
        request.query(opts.to_params())
    }

    fn window(opts: &QueryOptions) -> &'static str {
        if opts.is_historical() {
            "historical"
        } else {
            "latest"
        }
    }

    /// Latest or historical view of a pair resource.
    async fn pair_series<L: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        pair: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<L>> {
        let pair = require_pair(pair)?;
        let request = Self::pair_request(resource, pair, Some(Self::window(opts)), opts);
        let payload = self.transport.get(&request).await?;
        shape::decode_series(payload, opts.is_historical())
    }

    /// Resources that only serve `{metadata, data}`.
    async fn pair_historical(
        &self,
        resource: &str,
        pair: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Historical> {
        let pair = require_pair(pair)?;
        let request = Self::pair_request(resource, pair, Some("historical"), opts);
        let payload = self.transport.get(&request).await?;
        shape::decode_historical(payload)
    }

    /// Current USD price of ether.
    pub async fn get_ether_price(&self) -> Web3DataResult<Decimal> {
        let payload = self.transport.get(&ether_price_request()).await?;
        shape::ether_quote(&payload, DEFAULT_CURRENCY)
    }

    pub async fn get_rankings(&self, opts: &QueryOptions) -> Web3DataResult<Rankings> {
        let request = Request::new(MARKET_ENDPOINT)
            .segment("rankings")
            .query(opts.to_params());
        let payload = self.transport.get(&request).await?;
        shape::decode(payload)
    }

    /// Exactly the requested features; every feature when `features` is empty.
    pub async fn get_features(
        &self,
        features: &[MarketFeature],
        opts: &QueryOptions,
    ) -> Web3DataResult<MarketFeatures> {
        let request = Request::new(MARKET_ENDPOINT)
            .segment("features")
            .query(opts.to_params());
        let payload = self.transport.get(&request).await?;
        shape::select_features(payload, features)
    }

    /// Latest candle per exchange, or the candle history.
    pub async fn get_ohlcv(&self, pair: &str, opts: &QueryOptions) -> Web3DataResult<Series<OhlcvLatest>> {
        self.pair_series("ohlcv", pair, opts).await
    }

    /// Order book snapshot for a pair on one or more exchanges.
    pub async fn get_orders<S: AsRef<str>>(
        &self,
        pair: &str,
        exchanges: &[S],
        opts: &QueryOptions,
    ) -> Web3DataResult<Historical<OrderSides>> {
        let pair = require_pair(pair)?;
        let exchanges = require_exchange(exchanges)?;
        let mut opts = opts.clone();
        opts.exchange = exchanges.into_iter().map(str::to_string).collect();
        let request = Self::pair_request("orders", pair, None, &opts);
        let payload = self.transport.get(&request).await?;
        shape::decode_historical(payload)
    }

    /// Best bid and offer per exchange and pair, or their history.
    pub async fn get_bbos(&self, pair: &str, opts: &QueryOptions) -> Web3DataResult<Series<BboLatest>> {
        self.pair_series("bbos", pair, opts).await
    }

    pub async fn get_prices(&self, pair: &str, opts: &QueryOptions) -> Web3DataResult<Series<PairPrice>> {
        self.pair_series("prices", pair, opts).await
    }

    /// Token prices by token contract address.
    pub async fn get_token_prices(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<TokenPrice>>> {
        let hash = require_pair(hash)?;
        let request = Request::new(MARKET_ENDPOINT)
            .segment("tokens")
            .segment("prices")
            .segment(hash)
            .segment(Self::window(opts))
            .query(opts.to_params());
        let payload = self.transport.get(&request).await?;
        shape::decode_list_series(payload, opts.is_historical())
    }

    /// Volume and time weighted prices of every pair with `base`, narrowed
    /// by `quote` when set.
    pub async fn get_vwap(&self, base: &str, opts: &QueryOptions) -> Web3DataResult<VwapLatest> {
        let base = require_pair(base)?;
        let request = Self::pair_request("vwap", base, Some("latest"), opts);
        let payload = self.transport.get(&request).await?;
        shape::decode(payload)
    }

    pub async fn get_tickers(&self, pair: &str, opts: &QueryOptions) -> Web3DataResult<Series<TickerLatest>> {
        self.pair_series("tickers", pair, opts).await
    }

    pub async fn get_trades(&self, pair: &str, opts: &QueryOptions) -> Web3DataResult<Historical> {
        self.pair_historical("trades", pair, opts).await
    }

    pub async fn get_order_books(&self, pair: &str, opts: &QueryOptions) -> Web3DataResult<Historical> {
        self.pair_historical("order-book-updates", pair, opts).await
    }

    /// Token contract addresses for the given asset symbols; every known
    /// asset when `assets` is empty.
    pub async fn get_asset_addresses<S: AsRef<str>>(
        &self,
        assets: &[S],
        opts: &QueryOptions,
    ) -> Web3DataResult<AssetAddresses> {
        let wanted: Vec<&str> = assets.iter().map(|a| a.as_ref()).collect();
        let mut query = opts.to_params();
        if !wanted.is_empty() {
            query.insert(PARAM_ASSETS, wanted.join(","));
        }
        let request = Request::new(MARKET_ENDPOINT)
            .segment("assets")
            .segment("addresses")
            .query(query);
        let payload = self.transport.get(&request).await?;
        shape::select_keys(payload, &wanted)?
            .into_iter()
            .map(|(symbol, entry)| {
                let address = match &entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(fields) => fields
                        .get("address")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                };
                address
                    .map(|a| (symbol.clone(), a))
                    .ok_or_else(|| Web3DataError::Decode(format!("no address for asset '{symbol}'")))
            })
            .collect()
    }
}
