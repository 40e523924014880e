//! Endpoint paths, header names and error messages.

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://web3api.io/api/v2";

/// API key header.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Optional header selecting the blockchain (e.g. ethereum mainnet).
pub const BLOCKCHAIN_ID_HEADER: &str = "x-amberdata-blockchain-id";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Currency used for price enrichment unless overridden.
pub const DEFAULT_CURRENCY: &str = "usd";

// ── Resource endpoints ──────────────────────────────────────────────

pub const ADDRESSES_ENDPOINT: &str = "/addresses";
pub const BLOCKS_ENDPOINT: &str = "/blocks";
pub const MARKET_ENDPOINT: &str = "/market";

// ── Missing-identifier messages ─────────────────────────────────────

pub const ERROR_MESSAGE_ADDRESS_NO_ADDRESS: &str = "No address hash";
pub const ERROR_MESSAGE_BLOCK_NO_ID: &str = "No Block number or hash";
pub const ERROR_MESSAGE_MARKET_NO_PAIR: &str = "No market pair";
pub const ERROR_MESSAGE_MARKET_NO_EXCHANGE: &str = "No exchange specified";

/// Wei per ether (10^18), used when pricing raw balances.
pub const WEI_PER_ETHER_SCALE: u32 = 18;
