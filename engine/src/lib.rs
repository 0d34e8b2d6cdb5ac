//! Exchange-rate oracle consensus engine.
//!
//! Validators commit to a hash of their rates (prevote), reveal them one vote
//! period later (vote), and at the last block of every vote period the
//! engine tallies a power-weighted median per denom, rewards validators that
//! voted inside the reward band, and counts misses. Once per slash window
//! validators with too many misses are slashed and jailed.
//!
//! Everything runs inside a single deterministic end-of-block step; all rate
//! math goes through [`oracle_types::Dec`].

pub mod ballot;
pub mod claim;
pub mod error;
pub mod events;
pub mod genesis;
pub mod keeper;
pub mod msg_server;
pub mod period;
pub mod query;
pub mod reward;
pub mod slashing;
pub mod tally;
pub mod whitelist;

pub use ballot::{ExchangeRateBallot, VoteForTally};
pub use claim::{Claim, ClaimMap};
pub use error::{GenesisError, OracleError};
pub use events::{EventBus, OracleEvent};
pub use genesis::GenesisState;
pub use keeper::{OracleKeeper, MODULE_NAME};
pub use period::PeriodOutcome;
