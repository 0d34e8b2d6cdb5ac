//! Keeping vote targets in line with the whitelist parameter.

use crate::error::OracleError;
use crate::keeper::OracleKeeper;
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{Dec, Denom};
use std::collections::BTreeMap;
use tracing::info;

/// Whether the stored vote targets differ from `whitelist` in names or tax.
pub fn vote_targets_need_update(targets: &BTreeMap<String, Dec>, whitelist: &[Denom]) -> bool {
    if targets.len() != whitelist.len() {
        return true;
    }
    whitelist
        .iter()
        .any(|denom| targets.get(&denom.name) != Some(&denom.tobin_tax))
}

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// Replace the vote targets with `whitelist` if they differ. Exchange
    /// rates of denoms dropped from the whitelist are deleted. Returns whether
    /// anything changed.
    pub fn reconcile_vote_targets(&self, whitelist: &[Denom]) -> Result<bool, OracleError> {
        let targets = self.vote_targets()?;
        if !vote_targets_need_update(&targets, whitelist) {
            return Ok(false);
        }

        for denom in targets.keys() {
            self.store().delete_tobin_tax(denom)?;
            if !whitelist.iter().any(|d| &d.name == denom) {
                self.store().delete_exchange_rate(denom)?;
                info!(denom = %denom, "denom removed from vote targets");
            }
        }
        for denom in whitelist {
            self.store().set_tobin_tax(&denom.name, denom.tobin_tax)?;
        }
        info!(targets = whitelist.len(), "vote targets updated from whitelist");
        Ok(true)
    }
}
