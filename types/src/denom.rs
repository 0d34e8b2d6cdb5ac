//! Denominations and whitelist entries.

use crate::decimal::Dec;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// The base asset every exchange rate is quoted against.
pub const BASE_DENOM: &str = "uorc";

const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 128;

/// A whitelisted denom together with its tobin tax.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denom {
    pub name: String,
    pub tobin_tax: Dec,
}

impl Denom {
    pub fn new(name: impl Into<String>, tobin_tax: Dec) -> Self {
        Self {
            name: name.into(),
            tobin_tax,
        }
    }
}

/// Check that `denom` starts with a letter and contains 3..=128 characters
/// drawn from `[A-Za-z0-9/:._-]`.
pub fn validate_denom(denom: &str) -> Result<(), TypesError> {
    let bytes = denom.as_bytes();
    if bytes.len() < MIN_DENOM_LEN || bytes.len() > MAX_DENOM_LEN {
        return Err(TypesError::InvalidDenom(format!(
            "{denom:?} must be {MIN_DENOM_LEN}..={MAX_DENOM_LEN} characters"
        )));
    }
    if !bytes[0].is_ascii_alphabetic() {
        return Err(TypesError::InvalidDenom(format!(
            "{denom:?} must start with a letter"
        )));
    }
    let allowed = |b: &u8| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-');
    if !bytes.iter().all(allowed) {
        return Err(TypesError::InvalidDenom(format!(
            "{denom:?} contains an illegal character"
        )));
    }
    Ok(())
}
