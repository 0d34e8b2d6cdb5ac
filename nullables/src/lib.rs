//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the oracle engine (its key-value store and
//! the staking, distribution and bank modules) is abstracted behind a trait
//! in `oracle-store`. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod bank;
pub mod distribution;
pub mod staking;
pub mod store;

pub use bank::NullBank;
pub use distribution::NullDistribution;
pub use staking::{NullStaking, SlashRecord};
pub use store::NullOracleStore;
