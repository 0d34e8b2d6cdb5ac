//! Liveness slashing at the end of each slash window.

use crate::error::OracleError;
use crate::keeper::OracleKeeper;
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{Dec, OracleParams, ValAddress};
use tracing::{info, warn};

/// Blocks between a staking change and its effect on the consensus set.
pub const VALIDATOR_UPDATE_DELAY: u64 = 1;

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// Slash and jail every bonded, unjailed validator whose valid vote rate
    /// over the window fell below `min_valid_per_window`, then delete every
    /// miss counter. Returns the slashed validators.
    pub fn slash_and_reset_miss_counters(
        &self,
        height: u64,
        params: &OracleParams,
    ) -> Result<Vec<ValAddress>, OracleError> {
        let distribution_height = height.saturating_sub(VALIDATOR_UPDATE_DELAY + 1);
        let periods = params.vote_periods_per_window() as i128;
        let power_reduction = self.staking().power_reduction();

        let mut slashed = Vec::new();
        for (validator, misses) in self.store().iter_miss_counters()? {
            let valid_vote_rate = Dec::from_ratio(periods - misses as i128, periods)
                .ok_or_else(|| OracleError::Overflow("valid vote rate".into()))?;

            if valid_vote_rate < params.min_valid_per_window {
                match self.staking().validator(&validator)? {
                    Some(info) if info.bonded && !info.jailed => {
                        let power = info.consensus_power(power_reduction);
                        self.staking().slash(
                            &validator,
                            distribution_height,
                            power,
                            params.slash_fraction,
                        )?;
                        self.staking().jail(&validator)?;
                        warn!(
                            validator = %validator,
                            misses,
                            valid_vote_rate = %valid_vote_rate,
                            "validator slashed and jailed for missing oracle votes"
                        );
                        slashed.push(validator.clone());
                    }
                    _ => {}
                }
            }
            self.store().delete_miss_counter(&validator)?;
        }
        info!(height, slashed = slashed.len(), "slash window closed, miss counters reset");
        Ok(slashed)
    }
}
