//! Nullable staking module: a programmable validator set.

use oracle_store::{StakingKeeper, StoreError, ValidatorInfo};
use oracle_types::{Dec, ValAddress};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// One recorded `slash` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashRecord {
    pub operator: ValAddress,
    pub infraction_height: u64,
    pub power: u64,
    pub fraction: Dec,
    /// Tokens burned by this slash.
    pub burned: u128,
}

/// An in-memory staking module for testing.
///
/// Slashing burns `fraction` of the validator's tokens and records the call;
/// jailing flips the validator's `jailed` flag and removes it from the
/// bonded set returned by [`StakingKeeper::bonded_validators_by_power`].
pub struct NullStaking {
    validators: Mutex<BTreeMap<ValAddress, ValidatorInfo>>,
    slashes: Mutex<Vec<SlashRecord>>,
    max_validators: u32,
    power_reduction: u128,
}

impl NullStaking {
    pub fn new(max_validators: u32, power_reduction: u128) -> Self {
        Self {
            validators: Mutex::new(BTreeMap::new()),
            slashes: Mutex::new(Vec::new()),
            max_validators,
            power_reduction,
        }
    }

    /// Add or replace a bonded, unjailed validator.
    pub fn add_validator(&self, operator: &ValAddress, tokens: u128) {
        self.validators.lock().unwrap().insert(
            operator.clone(),
            ValidatorInfo {
                operator: operator.clone(),
                tokens,
                bonded: true,
                jailed: false,
            },
        );
    }

    pub fn set_bonded(&self, operator: &ValAddress, bonded: bool) {
        if let Some(v) = self.validators.lock().unwrap().get_mut(operator) {
            v.bonded = bonded;
        }
    }

    pub fn tokens(&self, operator: &ValAddress) -> u128 {
        self.validators
            .lock()
            .unwrap()
            .get(operator)
            .map(|v| v.tokens)
            .unwrap_or(0)
    }

    pub fn is_jailed(&self, operator: &ValAddress) -> bool {
        self.validators
            .lock()
            .unwrap()
            .get(operator)
            .map(|v| v.jailed)
            .unwrap_or(false)
    }

    pub fn slashes(&self) -> Vec<SlashRecord> {
        self.slashes.lock().unwrap().clone()
    }
}

impl Default for NullStaking {
    fn default() -> Self {
        Self::new(100, 1_000_000)
    }
}

impl StakingKeeper for NullStaking {
    fn validator(&self, operator: &ValAddress) -> Result<Option<ValidatorInfo>, StoreError> {
        Ok(self.validators.lock().map_err(|_| poisoned())?.get(operator).cloned())
    }

    fn bonded_validators_by_power(&self) -> Result<Vec<ValidatorInfo>, StoreError> {
        let mut bonded: Vec<ValidatorInfo> = self
            .validators
            .lock()
            .map_err(|_| poisoned())?
            .values()
            .filter(|v| v.bonded && !v.jailed)
            .cloned()
            .collect();
        // Descending tokens, operator address as a deterministic tie-break.
        bonded.sort_by(|a, b| b.tokens.cmp(&a.tokens).then_with(|| a.operator.cmp(&b.operator)));
        Ok(bonded)
    }

    fn max_validators(&self) -> u32 {
        self.max_validators
    }

    fn power_reduction(&self) -> u128 {
        self.power_reduction
    }

    fn slash(
        &self,
        operator: &ValAddress,
        infraction_height: u64,
        power: u64,
        fraction: Dec,
    ) -> Result<(), StoreError> {
        let mut validators = self.validators.lock().map_err(|_| poisoned())?;
        let validator = validators
            .get_mut(operator)
            .ok_or_else(|| StoreError::NotFound(operator.to_string()))?;
        let tokens = Dec::from_u128(validator.tokens).ok_or_else(|| StoreError::Collaborator {
            module: "staking".into(),
            reason: "token amount overflows decimal".into(),
        })?;
        let burned = tokens
            .checked_mul(fraction)
            .map(|d| d.truncate_to_u128())
            .unwrap_or(0)
            .min(validator.tokens);
        validator.tokens -= burned;
        self.slashes.lock().map_err(|_| poisoned())?.push(SlashRecord {
            operator: operator.clone(),
            infraction_height,
            power,
            fraction,
            burned,
        });
        Ok(())
    }

    fn jail(&self, operator: &ValAddress) -> Result<(), StoreError> {
        let mut validators = self.validators.lock().map_err(|_| poisoned())?;
        let validator = validators
            .get_mut(operator)
            .ok_or_else(|| StoreError::NotFound(operator.to_string()))?;
        validator.jailed = true;
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("null staking mutex poisoned".into())
}
