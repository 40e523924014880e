pub mod address;
pub mod block;
pub mod config;
pub mod de;
pub mod market;
pub mod query;
pub mod series;
pub mod time;

pub use block::BlockId;
pub use config::ClientConfig;
pub use market::MarketFeature;
pub use query::{QueryOptions, TimeFormat, ValidationMethod};
pub use series::{Historical, Metadata, Series};
pub use time::Timestamp;
