//! Reward distribution to ballot winners.

use crate::claim::ClaimMap;
use crate::error::OracleError;
use crate::keeper::{OracleKeeper, MODULE_NAME};
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{Coin, Coins, Dec, BASE_DENOM};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// Pay out this period's slice of the reward pool to the winners in
    /// `claims`, proportionally to their win weight.
    ///
    /// The slice of each pool is `vote_period / reward_distribution_window`.
    /// Per-validator amounts are truncated; the remainder stays in the pool.
    /// Returns the total moved to the distribution module.
    pub fn reward_ballot_winners(
        &self,
        vote_period: u64,
        reward_distribution_window: u64,
        vote_targets: &BTreeMap<String, Dec>,
        claims: &ClaimMap,
    ) -> Result<Coins, OracleError> {
        let weight_sum: u128 = claims.values().map(|c| c.weight as u128).sum();
        if weight_sum == 0 {
            debug!("no ballot winners with weight, skipping rewards");
            return Ok(Coins::new());
        }

        let ratio = Dec::from_ratio(vote_period as i128, reward_distribution_window as i128)
            .ok_or_else(|| OracleError::Overflow("reward distribution ratio".into()))?;

        let mut reward_denoms: BTreeSet<&str> = vote_targets.keys().map(String::as_str).collect();
        reward_denoms.insert(BASE_DENOM);

        let pool = self.bank().module_balance(MODULE_NAME)?;
        let mut period_rewards = Vec::new();
        for denom in reward_denoms {
            let amount = pool.amount_of(denom);
            if amount == 0 {
                continue;
            }
            let slice = Dec::from_u128(amount)
                .and_then(|a| a.checked_mul(ratio))
                .ok_or_else(|| OracleError::Overflow(format!("reward pool of {denom}")))?;
            period_rewards.push((denom, slice));
        }

        let mut distributed = Coins::new();
        for claim in claims.values() {
            if self.staking().validator(&claim.recipient)?.is_none() {
                debug!(validator = %claim.recipient, "reward recipient left the validator set");
                continue;
            }
            let share = Dec::from_ratio(claim.weight as i128, weight_sum as i128)
                .ok_or_else(|| OracleError::Overflow("reward share".into()))?;

            let mut rewards = Coins::new();
            for (denom, slice) in &period_rewards {
                let amount = slice
                    .checked_mul(share)
                    .ok_or_else(|| OracleError::Overflow(format!("reward in {denom}")))?
                    .truncate_to_u128();
                rewards.add(Coin::new(*denom, amount));
            }
            if rewards.is_zero() {
                continue;
            }
            self.distribution()
                .allocate_tokens_to_validator(&claim.recipient, &rewards)?;
            distributed.merge(&rewards);
        }

        if !distributed.is_zero() {
            self.bank().send_coins_from_module_to_module(
                MODULE_NAME,
                self.distribution().module_account(),
                &distributed,
            )?;
            info!(rewards = %distributed, "oracle rewards distributed");
        }
        Ok(distributed)
    }
}
