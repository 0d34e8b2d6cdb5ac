//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or validating core oracle types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid decimal {0:?}")]
    InvalidDecimal(String),

    #[error("decimal {0:?} has more than 18 fractional digits")]
    TooPrecise(String),

    #[error("decimal arithmetic overflow")]
    DecimalOverflow,

    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),
}
