//! Prevote message: the commit half of commit-reveal.

use oracle_types::{AccAddress, ValAddress};
use serde::{Deserialize, Serialize};

/// Commit to the rates a validator will reveal next vote period.
///
/// `hash` is the hex form of `vote_hash(salt, exchange_rates, validator)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAggregateExchangeRatePrevote {
    pub hash: String,
    pub feeder: AccAddress,
    pub validator: ValAddress,
}

impl MsgAggregateExchangeRatePrevote {
    pub fn new(hash: impl Into<String>, feeder: AccAddress, validator: ValAddress) -> Self {
        Self {
            hash: hash.into(),
            feeder,
            validator,
        }
    }
}
