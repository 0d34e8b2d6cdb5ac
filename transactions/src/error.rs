use oracle_types::TypesError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid vote hash {hash:?}: {reason}")]
    InvalidHash { hash: String, reason: String },

    #[error("salt must be 1 to 4 bytes, got {len}")]
    InvalidSalt { len: usize },

    #[error("exchange rates must not be empty")]
    EmptyExchangeRates,

    #[error("exchange rates string is {len} bytes, limit is {max}")]
    ExchangeRatesTooLong { len: usize, max: usize },

    #[error("malformed exchange rate tuple {tuple:?}: {reason}")]
    InvalidTuple { tuple: String, reason: String },

    #[error("duplicate denom {0} in exchange rates")]
    DuplicateDenom(String),

    #[error("negative exchange rate for {0}")]
    NegativeRate(String),

    #[error(transparent)]
    Types(#[from] TypesError),
}
