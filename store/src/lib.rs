//! Abstract storage traits for the oracle.
//!
//! Every backend (a real key-value store, the in-memory nullables for
//! testing) implements these traits. The engine depends only on the traits.
//!
//! The staking, distribution and bank modules are external collaborators;
//! their traits live here too so that backends and test doubles can
//! implement them without depending on the engine.

pub mod bank;
pub mod distribution;
pub mod error;
pub mod exchange_rate;
pub mod feeder;
pub mod miss_counter;
pub mod params;
pub mod staking;
pub mod tobin_tax;
pub mod vote;

pub use bank::BankKeeper;
pub use distribution::DistributionKeeper;
pub use error::StoreError;
pub use exchange_rate::ExchangeRateStore;
pub use feeder::FeederDelegationStore;
pub use miss_counter::MissCounterStore;
pub use params::ParamsStore;
pub use staking::{StakingKeeper, ValidatorInfo};
pub use tobin_tax::TobinTaxStore;
pub use vote::VoteStore;

/// Everything the oracle persists, behind one bound.
pub trait OracleStore:
    ExchangeRateStore
    + FeederDelegationStore
    + MissCounterStore
    + ParamsStore
    + TobinTaxStore
    + VoteStore
{
}

impl<T> OracleStore for T where
    T: ExchangeRateStore
        + FeederDelegationStore
        + MissCounterStore
        + ParamsStore
        + TobinTaxStore
        + VoteStore
{
}
