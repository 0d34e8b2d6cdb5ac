//! Nullable distribution module: records allocated validator rewards.

use oracle_store::{DistributionKeeper, StoreError};
use oracle_types::{Coins, ValAddress};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory distribution module for testing.
pub struct NullDistribution {
    outstanding: Mutex<BTreeMap<ValAddress, Coins>>,
    module_account: String,
}

impl NullDistribution {
    pub fn new(module_account: impl Into<String>) -> Self {
        Self {
            outstanding: Mutex::new(BTreeMap::new()),
            module_account: module_account.into(),
        }
    }

    /// Rewards allocated to a validator so far.
    pub fn rewards_of(&self, validator: &ValAddress) -> Coins {
        self.outstanding
            .lock()
            .unwrap()
            .get(validator)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for NullDistribution {
    fn default() -> Self {
        Self::new("distribution")
    }
}

impl DistributionKeeper for NullDistribution {
    fn allocate_tokens_to_validator(
        &self,
        validator: &ValAddress,
        rewards: &Coins,
    ) -> Result<(), StoreError> {
        self.outstanding
            .lock()
            .map_err(|_| StoreError::Backend("null distribution mutex poisoned".into()))?
            .entry(validator.clone())
            .or_default()
            .merge(rewards);
        Ok(())
    }

    fn module_account(&self) -> &str {
        &self.module_account
    }
}
