//! Address facade.

use std::sync::Arc;

use futures::future::{self, Either};
use serde_json::Value;
use tracing::debug;

use web3data_common::constants::{ADDRESSES_ENDPOINT, MARKET_ENDPOINT};
use web3data_common::{Request, Transport, Web3DataError, Web3DataResult};
use web3data_types::address::{
    AccountBalance, AccountBalances, AddressInformation, AddressMetadata, AddressMetrics,
    AddressSummary, FunctionCall, InternalMessage, Log, Token, TokenBalance, TokenTransfer,
    Transaction,
};
use web3data_types::{Historical, QueryOptions, Series};

use crate::shape;
use crate::validate::{require_address, require_addresses};

/// Query parameter carrying the address list for multi-address balances.
const PARAM_ADDRESSES: &str = "addresses";

#[derive(Clone)]
pub struct AddressApi {
    transport: Arc<dyn Transport>,
}

impl AddressApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn request(hash: &str, sub: &str, opts: &QueryOptions) -> Request {
        Request::new(ADDRESSES_ENDPOINT)
            .segment(hash)
            .segment(sub)
            .query(opts.to_params())
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        hash: &str,
        sub: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<T>>> {
        let hash = require_address(hash)?;
        let payload = self.transport.get(&Self::request(hash, sub, opts)).await?;
        shape::decode_list_series(payload, opts.is_historical())
    }

    /// Every known address, filtered by `type` when given.
    pub async fn get_all(&self, opts: &QueryOptions) -> Web3DataResult<Vec<AddressSummary>> {
        let request = Request::new(ADDRESSES_ENDPOINT).query(opts.to_params());
        let payload = self.transport.get(&request).await?;
        shape::decode_list(payload)
    }

    /// Same as [`get_all`](Self::get_all).
    pub async fn get_all_addresses(&self, opts: &QueryOptions) -> Web3DataResult<Vec<AddressSummary>> {
        self.get_all(opts).await
    }

    /// Address information, with `price` merged when `includePrice` is set
    /// and `tokens` when `includeTokens` is set.
    pub async fn get_information(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<AddressInformation> {
        let hash = require_address(hash)?;
        let request = Self::request(hash, "information", &opts.without_enrichment());
        let record = self.enriched(hash, request, opts).await?;
        shape::decode(record)
    }

    pub async fn get_metadata(&self, hash: &str, opts: &QueryOptions) -> Web3DataResult<AddressMetadata> {
        let hash = require_address(hash)?;
        let payload = self.transport.get(&Self::request(hash, "metadata", opts)).await?;
        shape::decode(payload)
    }

    /// Adoption series; always `{metadata, data}`.
    pub async fn get_adoption(&self, hash: &str, opts: &QueryOptions) -> Web3DataResult<Historical> {
        let hash = require_address(hash)?;
        let payload = self.transport.get(&Self::request(hash, "adoption", opts)).await?;
        shape::decode_historical(payload)
    }

    pub async fn get_internal_messages(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<InternalMessage>>> {
        self.list(hash, "internal-messages", opts).await
    }

    pub async fn get_functions(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<FunctionCall>>> {
        self.list(hash, "functions", opts).await
    }

    pub async fn get_logs(&self, hash: &str, opts: &QueryOptions) -> Web3DataResult<Series<Vec<Log>>> {
        self.list(hash, "logs", opts).await
    }

    pub async fn get_transactions(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<Transaction>>> {
        self.list(hash, "transactions", opts).await
    }

    pub async fn get_pending_transactions(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<Transaction>>> {
        self.list(hash, "pending-transactions", opts).await
    }

    pub async fn get_tokens(&self, hash: &str, opts: &QueryOptions) -> Web3DataResult<Series<Vec<Token>>> {
        self.list(hash, "tokens", opts).await
    }

    pub async fn get_token_transfers(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<TokenTransfer>>> {
        self.list(hash, "token-transfers", opts).await
    }

    /// Token holdings of the address, read as balances.
    pub async fn get_token_balances(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<Vec<TokenBalance>>> {
        self.list(hash, "tokens", opts).await
    }

    /// Usage series; always `{metadata, data}`.
    pub async fn get_usage(&self, hash: &str, opts: &QueryOptions) -> Web3DataResult<Historical> {
        let hash = require_address(hash)?;
        let payload = self.transport.get(&Self::request(hash, "usage", opts)).await?;
        shape::decode_historical(payload)
    }

    /// Latest balance of one address, or its history when a date range is
    /// given. Enrichment is local for the latest form and forwarded to the
    /// provider for the historical form.
    pub async fn get_balance(
        &self,
        hash: &str,
        opts: &QueryOptions,
    ) -> Web3DataResult<Series<AccountBalance>> {
        let hash = require_address(hash)?;
        if opts.is_historical() {
            let request = Self::request(hash, "account-balances/historical", opts);
            let payload = self.transport.get(&request).await?;
            return shape::decode_historical(payload).map(Series::Historical);
        }

        let request = Self::request(hash, "account-balances/latest", &opts.without_enrichment());
        let record = self.enriched(hash, request, opts).await?;
        shape::decode(record).map(Series::Latest)
    }

    /// Latest balances of several addresses, keyed by address. Options
    /// (`includePrice`, `includeTokens`, `currency`) are forwarded.
    pub async fn get_balances<S: AsRef<str>>(
        &self,
        hashes: &[S],
        opts: &QueryOptions,
    ) -> Web3DataResult<AccountBalances> {
        let hashes = require_addresses(hashes)?;
        let mut query = opts.to_params();
        query.insert(PARAM_ADDRESSES, hashes.join(","));
        let request = Request::new(ADDRESSES_ENDPOINT).segment("balances").query(query);
        let payload = self.transport.get(&request).await?;
        shape::keyed_by_address(payload)?
            .into_iter()
            .map(|(address, row)| shape::decode(row).map(|balance| (address, balance)))
            .collect()
    }

    pub async fn get_metrics(&self, hash: &str, opts: &QueryOptions) -> Web3DataResult<AddressMetrics> {
        let hash = require_address(hash)?;
        let payload = self.transport.get(&Self::request(hash, "metrics", opts)).await?;
        shape::decode(payload)
    }

    // ── Enrichment ───────────────────────────────────────────────────

    /// Issue the primary request alongside any enrichment lookups and merge
    /// the results. Any failure fails the call.
    async fn enriched(&self, hash: &str, primary: Request, opts: &QueryOptions) -> Web3DataResult<Value> {
        let price_request = ether_price_request();
        let price = if opts.include_price {
            Either::Left(self.transport.get(&price_request))
        } else {
            Either::Right(future::ok::<_, Web3DataError>(Value::Null))
        };
        let tokens_request = Request::new(ADDRESSES_ENDPOINT).segment(hash).segment("tokens");
        let tokens = if opts.include_tokens {
            Either::Left(self.transport.get(&tokens_request))
        } else {
            Either::Right(future::ok::<_, Web3DataError>(Value::Null))
        };

        let (mut record, prices, tokens) =
            future::try_join3(self.transport.get(&primary), price, tokens).await?;

        if opts.include_price {
            let currency = opts.currency_or_default();
            let quote = shape::ether_quote(&prices, currency)?;
            debug!(%hash, %currency, %quote, "merging price");
            shape::merge_price(&mut record, quote, currency)?;
        }
        if opts.include_tokens {
            debug!(%hash, "merging tokens");
            shape::merge_tokens(&mut record, tokens)?;
        }
        Ok(record)
    }
}

/// Latest ether prices keyed by pair (`eth_usd`, ...).
pub(crate) fn ether_price_request() -> Request {
    Request::new(MARKET_ENDPOINT)
        .segment("prices")
        .segment("eth")
        .segment("latest")
}
