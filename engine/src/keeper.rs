//! The oracle keeper: owns the store and collaborator handles.
//!
//! Message handling, queries, genesis and the end-block hooks are
//! implemented on [`OracleKeeper`] in their own modules.

use crate::error::OracleError;
use crate::events::{EventBus, OracleEvent};
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{Dec, OracleParams, ValAddress};
use std::collections::BTreeMap;

/// Name of the oracle's module account holding the reward pool.
pub const MODULE_NAME: &str = "oracle";

pub struct OracleKeeper<S, K, D, B> {
    store: S,
    staking: K,
    distribution: D,
    bank: B,
    events: EventBus,
}

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    pub fn new(store: S, staking: K, distribution: D, bank: B) -> Self {
        Self {
            store,
            staking,
            distribution,
            bank,
            events: EventBus::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn staking(&self) -> &K {
        &self.staking
    }

    pub fn distribution(&self) -> &D {
        &self.distribution
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&OracleEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub(crate) fn emit(&self, event: OracleEvent) {
        self.events.emit(&event);
    }

    /// The stored parameter record.
    pub fn params(&self) -> Result<OracleParams, OracleError> {
        self.store.get_params()?.ok_or(OracleError::ParamsNotFound)
    }

    /// Replace the parameter record after validating it.
    pub fn set_params(&self, params: &OracleParams) -> Result<(), OracleError> {
        params.validate()?;
        self.store.set_params(params)?;
        Ok(())
    }

    /// Current vote targets with their tobin tax.
    pub fn vote_targets(&self) -> Result<BTreeMap<String, Dec>, OracleError> {
        Ok(self.store.iter_tobin_taxes()?.into_iter().collect())
    }

    pub fn is_vote_target(&self, denom: &str) -> Result<bool, OracleError> {
        Ok(self.store.get_tobin_tax(denom)?.is_some())
    }

    pub(crate) fn clear_exchange_rates(&self) -> Result<(), OracleError> {
        for (denom, _) in self.store.iter_exchange_rates()? {
            self.store.delete_exchange_rate(&denom)?;
        }
        Ok(())
    }

    /// Delete every vote, and every prevote older than the current period.
    ///
    /// Prevotes submitted during the period being closed are kept so they can
    /// be revealed in the next one.
    pub(crate) fn clear_ballots(&self, height: u64, vote_period: u64) -> Result<(), OracleError> {
        for prevote in self.store.iter_aggregate_prevotes()? {
            if height > prevote.submit_block.saturating_add(vote_period) {
                self.store.delete_aggregate_prevote(&prevote.voter)?;
            }
        }
        for vote in self.store.iter_aggregate_votes()? {
            self.store.delete_aggregate_vote(&vote.voter)?;
        }
        Ok(())
    }

    pub(crate) fn increment_miss_counter(&self, validator: &ValAddress) -> Result<u64, OracleError> {
        let count = self
            .store
            .get_miss_counter(validator)?
            .unwrap_or(0)
            .saturating_add(1);
        self.store.set_miss_counter(validator, count)?;
        Ok(count)
    }
}
