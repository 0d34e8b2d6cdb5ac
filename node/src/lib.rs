//! Oracle host harness.
//!
//! Stands in for the consensus engine that embeds the oracle: it loads a
//! TOML configuration and a JSON genesis, delivers each block's messages to
//! the keeper, isolates per-message failures, and runs the end-block hooks.

pub mod app;
pub mod config;
pub mod error;
pub mod tracing_spans;

pub use app::{BlockResult, InMemoryApp, OracleApp, TxResult};
pub use config::NodeConfig;
pub use error::NodeError;
