mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use web3data_common::Web3DataError;
use web3data_types::MarketFeature;

use commands::address::AddressMethod;
use commands::block::BlockMethod;
use commands::market::{MarketArgs, MarketMethod};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "web3data",
    about = "Blockchain data from the command line.\nAddresses, blocks and markets; every command prints JSON.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "json")]
    output: OutputFormat,

    /// Query options as a JSON object, e.g. '{"timeFormat":"iso","size":5}'.
    #[arg(long, global = true)]
    options: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// ═══════════════════════════════════════════════════════════════════════
//  TOP-LEVEL
// ═══════════════════════════════════════════════════════════════════════

#[derive(Subcommand)]
enum Commands {
    /// Address data: information, transactions, tokens, balances.
    Address {
        method: AddressMethod,
        /// Address hash. `balances` takes several.
        hashes: Vec<String>,
    },

    /// Block data: blocks, transaction counts, uncles.
    Block {
        method: BlockMethod,
        /// Block number or hash.
        id: Option<String>,
        /// Uncle index within the block.
        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Market data: prices, candles, order books, tickers.
    Market {
        method: MarketMethod,
        /// Market pair (e.g. eth_usd), base asset for vwap, token address for token-prices.
        pair: Option<String>,
        /// Exchange filter; required by `orders`.
        #[arg(long, value_delimiter = ',')]
        exchange: Vec<String>,
        /// Features to keep for `features` (default: all).
        #[arg(long, value_delimiter = ',')]
        features: Vec<MarketFeature>,
        /// Asset symbols for `asset-addresses` (default: all).
        #[arg(long, value_delimiter = ',')]
        assets: Vec<String>,
    },

    /// Manage ~/.web3data/config.json.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Create the config file with defaults.
    Init,
    /// Set a config key: api-key, base-url, blockchain-id, timeout.
    Set { key: String, value: String },
}

// ═══════════════════════════════════════════════════════════════════════
//  ENTRYPOINT
// ═══════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let fmt = cli.output;

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<Web3DataError>() {
            Some(e) => {
                output::render_error(fmt, e);
                std::process::exit(e.exit_code());
            }
            None => Err(err),
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let fmt = cli.output;
    let opts = commands::helpers::parse_options(cli.options.as_deref())?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(fmt),
            ConfigAction::Init => commands::config::init(fmt),
            ConfigAction::Set { key, value } => commands::config::set(&key, &value, fmt),
        },

        Commands::Address { method, hashes } => {
            let client = commands::helpers::client()?;
            commands::address::run(&client, method, &hashes, &opts, fmt).await
        }

        Commands::Block { method, id, index } => {
            let client = commands::helpers::client()?;
            commands::block::run(&client, method, id, index, &opts, fmt).await
        }

        Commands::Market { method, pair, exchange, features, assets } => {
            let client = commands::helpers::client()?;
            let args = MarketArgs { pair, exchanges: exchange, features, assets };
            commands::market::run(&client, method, args, opts, fmt).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_market_flags() {
        let cli = Cli::try_parse_from([
            "web3data",
            "market",
            "features",
            "--features",
            "pairs,tickers",
            "-o",
            "json-pretty",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::JsonPretty);
        match cli.command {
            Commands::Market { method, features, .. } => {
                assert_eq!(method, MarketMethod::Features);
                assert_eq!(features, vec![MarketFeature::Pairs, MarketFeature::Tickers]);
            }
            _ => panic!("expected market command"),
        }
    }

    #[test]
    fn test_parse_orders_exchanges() {
        let cli = Cli::try_parse_from([
            "web3data", "market", "orders", "eth_btc", "--exchange", "gdax,bitstamp",
        ])
        .unwrap();
        match cli.command {
            Commands::Market { pair, exchange, .. } => {
                assert_eq!(pair.as_deref(), Some("eth_btc"));
                assert_eq!(exchange, vec!["gdax", "bitstamp"]);
            }
            _ => panic!("expected market command"),
        }
    }

    #[test]
    fn test_parse_address_and_block() {
        let cli = Cli::try_parse_from([
            "web3data", "address", "balances", "0xa", "0xb", "--options", r#"{"includePrice":true}"#,
        ])
        .unwrap();
        assert!(cli.options.is_some());
        assert!(matches!(
            cli.command,
            Commands::Address { method: AddressMethod::Balances, ref hashes } if hashes.len() == 2
        ));

        let cli = Cli::try_parse_from(["web3data", "block", "uncle", "8102326", "--index", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Block { method: BlockMethod::Uncle, index: 1, .. }
        ));
    }

    #[test]
    fn test_unknown_feature_rejected() {
        assert!(Cli::try_parse_from(["web3data", "market", "features", "--features", "bogus"]).is_err());
    }
}
