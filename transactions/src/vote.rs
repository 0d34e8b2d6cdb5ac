//! Vote message: the reveal half of commit-reveal.

use oracle_types::{AccAddress, ValAddress};
use serde::{Deserialize, Serialize};

/// Reveal the salt and the tuple string committed to by the prior prevote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAggregateExchangeRateVote {
    pub salt: String,
    /// Comma-separated `<decimal><denom>` tuples, e.g. `1700.00usdr,0.0ukrw`.
    pub exchange_rates: String,
    pub feeder: AccAddress,
    pub validator: ValAddress,
}

impl MsgAggregateExchangeRateVote {
    pub fn new(
        salt: impl Into<String>,
        exchange_rates: impl Into<String>,
        feeder: AccAddress,
        validator: ValAddress,
    ) -> Self {
        Self {
            salt: salt.into(),
            exchange_rates: exchange_rates.into(),
            feeder,
            validator,
        }
    }
}
