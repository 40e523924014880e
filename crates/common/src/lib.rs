//! Shared building blocks for the web3data crates: errors, constants, the
//! request shape and the [`Transport`](traits::Transport) seam.

pub mod constants;
pub mod error;
pub mod request;
pub mod traits;

pub use error::{ErrorCategory, ErrorDetail, Web3DataError, Web3DataResult};
pub use request::{QueryParams, Request};
pub use traits::Transport;
