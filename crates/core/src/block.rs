//! Block facade. Lookups of a block that does not exist resolve to `None`.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use web3data_common::constants::BLOCKS_ENDPOINT;
use web3data_common::{Request, Transport, Web3DataError, Web3DataResult};
use web3data_types::block::{Block, Uncle};
use web3data_types::{BlockId, QueryOptions};

use crate::shape;
use crate::validate::require_block;

#[derive(Clone)]
pub struct BlockApi {
    transport: Arc<dyn Transport>,
}

impl BlockApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET that maps "no such block" (HTTP 404 or an empty payload) to `None`.
    async fn lookup(&self, request: Request) -> Web3DataResult<Option<Value>> {
        match self.transport.get(&request).await {
            Ok(payload) if shape::is_empty_payload(&payload) => Ok(None),
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.is_not_found() => {
                debug!(path = %request.path, "block not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn request(id: &BlockId, opts: &QueryOptions) -> Request {
        Request::new(BLOCKS_ENDPOINT)
            .segment(id.to_string())
            .query(opts.to_params())
    }

    pub async fn get_block(
        &self,
        id: impl Into<BlockId>,
        opts: &QueryOptions,
    ) -> Web3DataResult<Option<Block>> {
        let id = id.into();
        let id = require_block(&id)?;
        match self.lookup(Self::request(id, opts)).await? {
            Some(payload) => shape::decode_optional(payload),
            None => Ok(None),
        }
    }

    /// Number of the most recent block.
    pub async fn get_block_number(&self) -> Web3DataResult<u64> {
        let request = Request::new(BLOCKS_ENDPOINT).segment("latest");
        let payload = self.transport.get(&request).await?;
        payload
            .get("number")
            .and_then(shape::u64_of)
            .ok_or_else(|| Web3DataError::Decode("latest block has no number".into()))
    }

    pub async fn get_block_transaction_count(
        &self,
        id: impl Into<BlockId>,
        opts: &QueryOptions,
    ) -> Web3DataResult<Option<u64>> {
        let id = id.into();
        let id = require_block(&id)?;
        let Some(payload) = self.lookup(Self::request(id, opts)).await? else {
            return Ok(None);
        };
        match payload.get("numTransactions") {
            None | Some(Value::Null) => Ok(None),
            Some(count) => shape::u64_of(count).map(Some).ok_or_else(|| {
                Web3DataError::Decode(format!("numTransactions is not a count: {count}"))
            }),
        }
    }

    /// Uncle at `index` of the given block; `None` when there is none.
    pub async fn get_uncle(
        &self,
        id: impl Into<BlockId>,
        index: usize,
        opts: &QueryOptions,
    ) -> Web3DataResult<Option<Uncle>> {
        let id = id.into();
        let id = require_block(&id)?;
        let request = Request::new(BLOCKS_ENDPOINT)
            .segment(id.to_string())
            .segment("uncles")
            .query(opts.to_params());
        let Some(payload) = self.lookup(request).await? else {
            return Ok(None);
        };
        match shape::list_rows(payload).into_iter().nth(index) {
            Some(uncle) => shape::decode_optional(uncle),
            None => Ok(None),
        }
    }
}
