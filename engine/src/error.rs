//! Oracle engine errors.

use oracle_store::StoreError;
use oracle_transactions::TransactionError;
use oracle_types::TypesError;
use thiserror::Error;

/// Errors surfaced by message handling, queries and the end-block hooks.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] TransactionError),

    #[error("feeder {feeder} is not permitted to vote for {validator}")]
    NoVotingPermission { feeder: String, validator: String },

    #[error("validator {0} not found")]
    ValidatorNotFound(String),

    #[error("validator {0} is not in the active set")]
    ValidatorNotBonded(String),

    #[error("no aggregate prevote found for {0}")]
    NoAggregatePrevote(String),

    #[error("reveal at height {height} does not follow prevote at {submit_block} (vote period {vote_period})")]
    RevealPeriodMismatch {
        submit_block: u64,
        height: u64,
        vote_period: u64,
    },

    #[error("denom {0} is not a vote target")]
    UnknownDenom(String),

    #[error("revealed rates do not match prevote hash for {0}")]
    VerificationFailed(String),

    #[error("no exchange rate published for {0}")]
    ExchangeRateNotFound(String),

    #[error("oracle params are not initialized")]
    ParamsNotFound,

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OracleError {
    /// Fatal errors indicate a broken invariant or backend and must halt block
    /// processing. Everything else is a rejected message.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Overflow(_) | Self::Store(_) | Self::ParamsNotFound
        )
    }
}

/// Errors importing a genesis state. All of them are fatal.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("malformed address in genesis: {0}")]
    InvalidAddress(String),

    #[error("invalid genesis params: {0}")]
    InvalidParams(#[from] TypesError),

    #[error("duplicate genesis entry: {0}")]
    Duplicate(String),

    #[error("genesis json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
