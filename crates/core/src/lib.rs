// ── Request pipeline ──
pub mod shape;
pub mod validate;

// ── Transports ──
pub mod fixture;
pub mod http;

// ── Resource facades ──
pub mod address;
pub mod block;
pub mod client;
pub mod market;

// ── Local config ──
pub mod workspace;

pub use address::AddressApi;
pub use block::BlockApi;
pub use client::Web3Data;
pub use fixture::FixtureTransport;
pub use http::HttpTransport;
pub use market::MarketApi;
pub use workspace::init_workspace;
