//! Fundamental types for the exchange-rate oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! the fixed-point decimal, coins, addresses, denoms, commit hashes, vote records
//! and module parameters.

pub mod address;
pub mod coin;
pub mod decimal;
pub mod denom;
pub mod error;
pub mod hash;
pub mod params;
pub mod vote;

pub use address::{AccAddress, ValAddress};
pub use coin::{Coin, Coins};
pub use decimal::Dec;
pub use denom::{validate_denom, Denom, BASE_DENOM};
pub use error::TypesError;
pub use hash::VoteHash;
pub use params::OracleParams;
pub use vote::{AggregateExchangeRatePrevote, AggregateExchangeRateVote, ExchangeRateTuple};

/// Block height as seen by the host consensus engine.
pub type BlockHeight = u64;
