//! Account and validator-operator address types.
//!
//! Both wrap the textual encoding of the same 20-byte key; only the prefix
//! differs. Encoding, decoding and checksum validation live in `oracle-crypto`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account address, always prefixed with `orc1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccAddress(String);

impl AccAddress {
    /// The standard prefix for all account addresses.
    pub const PREFIX: &'static str = "orc1";

    /// Wrap a raw string. Use `oracle_crypto::parse_acc_address` for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_prefix(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validator operator address, always prefixed with `orcvaloper1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValAddress(String);

impl ValAddress {
    /// The standard prefix for all validator operator addresses.
    pub const PREFIX: &'static str = "orcvaloper1";

    /// Wrap a raw string. Use `oracle_crypto::parse_val_address` for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_prefix(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
