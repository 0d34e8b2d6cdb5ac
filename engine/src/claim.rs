//! Per-period validator claims.

use oracle_types::ValAddress;
use std::collections::BTreeMap;

/// One active validator's standing for the current vote period.
///
/// Built fresh every period from the bonded set, accumulated across every
/// tallied denom, then handed to the reward distributor and discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub recipient: ValAddress,
    /// Consensus power at the start of the period.
    pub power: u64,
    /// Sum of power over every ballot this validator won.
    pub weight: u64,
    /// Number of ballots this validator won.
    pub win_count: u64,
}

impl Claim {
    pub fn new(recipient: ValAddress, power: u64) -> Self {
        Self {
            recipient,
            power,
            weight: 0,
            win_count: 0,
        }
    }

    /// Credit a win carrying `power`.
    pub fn record_win(&mut self, power: u64) {
        self.weight = self.weight.saturating_add(power);
        self.win_count += 1;
    }
}

/// Claims keyed by validator, iterated in address order.
pub type ClaimMap = BTreeMap<ValAddress, Claim>;

/// Total power across every claim.
pub fn total_power(claims: &ClaimMap) -> u64 {
    claims
        .values()
        .fold(0u64, |acc, c| acc.saturating_add(c.power))
}
