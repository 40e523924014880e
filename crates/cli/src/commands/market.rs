use anyhow::Result;
use clap::ValueEnum;
use web3data_core::Web3Data;
use web3data_types::{MarketFeature, QueryOptions};

use crate::output::{render, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarketMethod {
    EtherPrice,
    Rankings,
    Features,
    Ohlcv,
    Orders,
    Bbos,
    Prices,
    /// Token prices; the positional argument is the token address.
    TokenPrices,
    /// VWAP; the positional argument is the base asset.
    Vwap,
    Tickers,
    Trades,
    OrderBooks,
    AssetAddresses,
}

/// Positional and flag arguments of `web3data market`.
#[derive(Debug, Default)]
pub struct MarketArgs {
    pub pair: Option<String>,
    pub exchanges: Vec<String>,
    pub features: Vec<MarketFeature>,
    pub assets: Vec<String>,
}

/// `web3data market <method> [pair] [--exchange ...]`
pub async fn run(
    client: &Web3Data,
    method: MarketMethod,
    args: MarketArgs,
    opts: QueryOptions,
    fmt: OutputFormat,
) -> Result<()> {
    let api = client.market();
    let pair = args.pair.as_deref().unwrap_or_default();
    let opts = with_exchanges(method, opts, &args.exchanges);
    let opts = &opts;

    match method {
        MarketMethod::EtherPrice => render(fmt, &api.get_ether_price().await?),
        MarketMethod::Rankings => render(fmt, &api.get_rankings(opts).await?),
        MarketMethod::Features => render(fmt, &api.get_features(&args.features, opts).await?),
        MarketMethod::Ohlcv => render(fmt, &api.get_ohlcv(pair, opts).await?),
        MarketMethod::Orders => render(fmt, &api.get_orders(pair, &args.exchanges, opts).await?),
        MarketMethod::Bbos => render(fmt, &api.get_bbos(pair, opts).await?),
        MarketMethod::Prices => render(fmt, &api.get_prices(pair, opts).await?),
        MarketMethod::TokenPrices => render(fmt, &api.get_token_prices(pair, opts).await?),
        MarketMethod::Vwap => render(fmt, &api.get_vwap(pair, opts).await?),
        MarketMethod::Tickers => render(fmt, &api.get_tickers(pair, opts).await?),
        MarketMethod::Trades => render(fmt, &api.get_trades(pair, opts).await?),
        MarketMethod::OrderBooks => render(fmt, &api.get_order_books(pair, opts).await?),
        MarketMethod::AssetAddresses => {
            render(fmt, &api.get_asset_addresses(&args.assets, opts).await?)
        }
    }
}

/// `--exchange` narrows every method; orders take the list as an argument.
fn with_exchanges(method: MarketMethod, opts: QueryOptions, exchanges: &[String]) -> QueryOptions {
    if method == MarketMethod::Orders {
        return opts;
    }
    exchanges.iter().fold(opts, |opts, name| opts.exchange(name))
}
