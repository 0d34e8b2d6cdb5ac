//! Feeder delegation message.

use oracle_types::{AccAddress, ValAddress};
use serde::{Deserialize, Serialize};

/// Authorize `delegate` to submit prevotes and votes for `operator`.
///
/// A later consent replaces the earlier one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegateFeedConsent {
    pub operator: ValAddress,
    pub delegate: AccAddress,
}

impl MsgDelegateFeedConsent {
    pub fn new(operator: ValAddress, delegate: AccAddress) -> Self {
        Self { operator, delegate }
    }
}
