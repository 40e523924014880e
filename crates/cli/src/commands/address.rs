use anyhow::Result;
use clap::ValueEnum;
use web3data_core::Web3Data;
use web3data_types::QueryOptions;

use crate::output::{render, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AddressMethod {
    All,
    Information,
    Metadata,
    Adoption,
    InternalMessages,
    Functions,
    Logs,
    Transactions,
    PendingTransactions,
    Tokens,
    TokenTransfers,
    TokenBalances,
    Usage,
    Balance,
    /// Several addresses at once.
    Balances,
    Metrics,
}

/// `web3data address <method> [hash...]`
pub async fn run(
    client: &Web3Data,
    method: AddressMethod,
    hashes: &[String],
    opts: &QueryOptions,
    fmt: OutputFormat,
) -> Result<()> {
    let api = client.address();
    // Missing hash is passed through as empty so the facade reports it.
    let hash = hashes.first().map(String::as_str).unwrap_or_default();

    match method {
        AddressMethod::All => render(fmt, &api.get_all(opts).await?),
        AddressMethod::Information => render(fmt, &api.get_information(hash, opts).await?),
        AddressMethod::Metadata => render(fmt, &api.get_metadata(hash, opts).await?),
        AddressMethod::Adoption => render(fmt, &api.get_adoption(hash, opts).await?),
        AddressMethod::InternalMessages => {
            render(fmt, &api.get_internal_messages(hash, opts).await?)
        }
        AddressMethod::Functions => render(fmt, &api.get_functions(hash, opts).await?),
        AddressMethod::Logs => render(fmt, &api.get_logs(hash, opts).await?),
        AddressMethod::Transactions => render(fmt, &api.get_transactions(hash, opts).await?),
        AddressMethod::PendingTransactions => {
            render(fmt, &api.get_pending_transactions(hash, opts).await?)
        }
        AddressMethod::Tokens => render(fmt, &api.get_tokens(hash, opts).await?),
        AddressMethod::TokenTransfers => render(fmt, &api.get_token_transfers(hash, opts).await?),
        AddressMethod::TokenBalances => render(fmt, &api.get_token_balances(hash, opts).await?),
        AddressMethod::Usage => render(fmt, &api.get_usage(hash, opts).await?),
        AddressMethod::Balance => render(fmt, &api.get_balance(hash, opts).await?),
        AddressMethod::Balances => render(fmt, &api.get_balances(hashes, opts).await?),
        AddressMethod::Metrics => render(fmt, &api.get_metrics(hash, opts).await?),
    }
}
