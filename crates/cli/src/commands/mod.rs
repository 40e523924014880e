pub mod address;
pub mod block;
pub mod config;
pub mod helpers;
pub mod market;
