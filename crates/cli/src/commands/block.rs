use anyhow::Result;
use clap::ValueEnum;
use web3data_core::Web3Data;
use web3data_types::{BlockId, QueryOptions};

use crate::output::{render, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockMethod {
    Get,
    /// Latest block number; takes no id.
    Number,
    TransactionCount,
    Uncle,
}

/// `web3data block <method> [id] [--index N]`
pub async fn run(
    client: &Web3Data,
    method: BlockMethod,
    id: Option<String>,
    index: usize,
    opts: &QueryOptions,
    fmt: OutputFormat,
) -> Result<()> {
    let api = client.block();
    let id = BlockId::from(id.unwrap_or_default());

    match method {
        BlockMethod::Get => render(fmt, &api.get_block(id, opts).await?),
        BlockMethod::Number => render(fmt, &api.get_block_number().await?),
        BlockMethod::TransactionCount => {
            render(fmt, &api.get_block_transaction_count(id, opts).await?)
        }
        BlockMethod::Uncle => render(fmt, &api.get_uncle(id, index, opts).await?),
    }
}
