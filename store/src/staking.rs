//! Read and penalize access to the staking module.

use crate::StoreError;
use oracle_types::{Dec, ValAddress};
use serde::{Deserialize, Serialize};

/// Snapshot of one validator as seen by the staking module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub operator: ValAddress,
    /// Bonded tokens in raw units.
    pub tokens: u128,
    pub bonded: bool,
    pub jailed: bool,
}

impl ValidatorInfo {
    /// Tokens divided by the power reduction, saturating at `u64::MAX`.
    pub fn consensus_power(&self, power_reduction: u128) -> u64 {
        let power = self.tokens / power_reduction.max(1);
        u64::try_from(power).unwrap_or(u64::MAX)
    }
}

pub trait StakingKeeper {
    fn validator(&self, operator: &ValAddress) -> Result<Option<ValidatorInfo>, StoreError>;

    /// Bonded validators in descending power order.
    fn bonded_validators_by_power(&self) -> Result<Vec<ValidatorInfo>, StoreError>;

    /// Size of the active validator set.
    fn max_validators(&self) -> u32;

    /// Tokens per unit of consensus power.
    fn power_reduction(&self) -> u128;

    /// Burn `fraction` of the stake backing `power` as of `infraction_height`.
    fn slash(
        &self,
        operator: &ValAddress,
        infraction_height: u64,
        power: u64,
        fraction: Dec,
    ) -> Result<(), StoreError>;

    fn jail(&self, operator: &ValAddress) -> Result<(), StoreError>;
}
