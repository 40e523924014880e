//! Entry point tying the three facades to one transport.

use std::sync::Arc;

use tracing::info;

use web3data_common::{Transport, Web3DataResult};
use web3data_types::ClientConfig;

use crate::address::AddressApi;
use crate::block::BlockApi;
use crate::http::HttpTransport;
use crate::market::MarketApi;

/// Blockchain data client.
///
/// ```ignore
/// let client = Web3Data::new(&ClientConfig::new(api_key))?;
/// let block = client.block().get_block(7_000_000_u64, &QueryOptions::default()).await?;
/// ```
#[derive(Clone)]
pub struct Web3Data {
    address: AddressApi,
    block: BlockApi,
    market: MarketApi,
}

impl Web3Data {
    /// HTTP-backed client. Fails without an API key.
    pub fn new(config: &ClientConfig) -> Web3DataResult<Self> {
        let transport = HttpTransport::new(config)?;
        info!(base_url = %config.base_url, "web3data client initialized");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Client over any transport, e.g. a [`FixtureTransport`](crate::FixtureTransport).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            address: AddressApi::new(transport.clone()),
            block: BlockApi::new(transport.clone()),
            market: MarketApi::new(transport),
        }
    }

    pub fn address(&self) -> &AddressApi {
        &self.address
    }

    pub fn block(&self) -> &BlockApi {
        &self.block
    }

    pub fn market(&self) -> &MarketApi {
        &self.market
    }
}
