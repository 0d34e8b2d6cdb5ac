//! End-of-block orchestration: the vote period tally and the slash window.

use crate::ballot::ExchangeRateBallot;
use crate::claim::{total_power, Claim, ClaimMap};
use crate::error::OracleError;
use crate::events::OracleEvent;
use crate::keeper::OracleKeeper;
use crate::tally::{
    credit_unpassed_abstains, organize_ballots, pick_reference_denom, tally, threshold_power,
};
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{Coins, Dec, OracleParams, ValAddress};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// What one end-of-block step did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodOutcome {
    /// Whether this block closed a vote period.
    pub tallied: bool,
    pub reference_denom: Option<String>,
    pub published: BTreeMap<String, Dec>,
    /// Validators whose miss counter went up.
    pub missed: Vec<ValAddress>,
    pub distributed: Coins,
    pub vote_targets_updated: bool,
    /// Whether this block closed a slash window.
    pub slash_window_closed: bool,
    pub slashed: Vec<ValAddress>,
}

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// End-of-block hook.
    ///
    /// `params` is the parameter record in force for this block; the whitelist
    /// and every threshold are read from it, never from ambient state.
    pub fn end_block(&self, height: u64, params: &OracleParams) -> Result<PeriodOutcome, OracleError> {
        let mut outcome = PeriodOutcome::default();
        if params.is_vote_period_last_block(height) {
            self.close_vote_period(height, params, &mut outcome)?;
        }
        if params.is_slash_window_last_block(height) {
            outcome.slash_window_closed = true;
            outcome.slashed = self.slash_and_reset_miss_counters(height, params)?;
        }
        Ok(outcome)
    }

    fn close_vote_period(
        &self,
        height: u64,
        params: &OracleParams,
        outcome: &mut PeriodOutcome,
    ) -> Result<(), OracleError> {
        outcome.tallied = true;

        let mut claims = self.build_claims()?;
        let vote_targets = self.vote_targets()?;
        self.clear_exchange_rates()?;

        let votes = self.store().iter_aggregate_votes()?;
        let mut ballots = organize_ballots(&votes, &claims);
        let threshold = threshold_power(total_power(&claims), params.vote_threshold);
        credit_unpassed_abstains(&ballots, &vote_targets, threshold, &mut claims);
        outcome.reference_denom = pick_reference_denom(&mut ballots, &vote_targets, threshold);

        if let Some(reference) = &outcome.reference_denom {
            outcome.published = self.tally_ballots(reference, ballots, params.reward_band, &mut claims)?;
        } else {
            debug!(height, "no ballot reached threshold, rates not updated");
        }

        let target_count = vote_targets.len() as u64;
        for claim in claims.values() {
            if claim.win_count != target_count {
                let misses = self.increment_miss_counter(&claim.recipient)?;
                debug!(validator = %claim.recipient, misses, "oracle vote missed");
                outcome.missed.push(claim.recipient.clone());
            }
        }

        outcome.distributed = self.reward_ballot_winners(
            params.vote_period,
            params.reward_distribution_window,
            &vote_targets,
            &claims,
        )?;

        self.clear_ballots(height, params.vote_period)?;
        outcome.vote_targets_updated = self.reconcile_vote_targets(&params.whitelist)?;

        info!(
            height,
            reference = outcome.reference_denom.as_deref().unwrap_or("none"),
            published = outcome.published.len(),
            missed = outcome.missed.len(),
            "vote period closed"
        );
        Ok(())
    }

    /// Claims for the bonded set, capped at the staking module's maximum.
    fn build_claims(&self) -> Result<ClaimMap, OracleError> {
        let power_reduction = self.staking().power_reduction();
        let max = self.staking().max_validators() as usize;
        Ok(self
            .staking()
            .bonded_validators_by_power()?
            .into_iter()
            .take(max)
            .map(|v| {
                let power = v.consensus_power(power_reduction);
                (v.operator.clone(), Claim::new(v.operator, power))
            })
            .collect())
    }

    /// Tally the reference ballot directly and every other ballot through
    /// cross rates, publishing each resulting rate.
    fn tally_ballots(
        &self,
        reference: &str,
        mut ballots: BTreeMap<String, ExchangeRateBallot>,
        reward_band: Dec,
        claims: &mut ClaimMap,
    ) -> Result<BTreeMap<String, Dec>, OracleError> {
        let mut published = BTreeMap::new();
        let Some(mut reference_ballot) = ballots.remove(reference) else {
            return Ok(published);
        };

        let reference_rate = tally(&mut reference_ballot, reward_band, claims);
        let reference_rates = reference_ballot.to_map();
        self.publish(reference, reference_rate, &mut published)?;

        for (denom, ballot) in ballots {
            let mut cross_ballot = ballot.to_cross_rate(&reference_rates);
            let cross_rate = tally(&mut cross_ballot, reward_band, claims);
            match reference_rate.checked_quo(cross_rate) {
                Some(rate) => self.publish(&denom, rate, &mut published)?,
                None => warn!(denom = %denom, "cross rate tallied to zero, rate not published"),
            }
        }
        Ok(published)
    }

    fn publish(
        &self,
        denom: &str,
        rate: Dec,
        published: &mut BTreeMap<String, Dec>,
    ) -> Result<(), OracleError> {
        if !rate.is_positive() {
            warn!(denom = %denom, rate = %rate, "non-positive tally, rate not published");
            return Ok(());
        }
        self.store().set_exchange_rate(denom, rate)?;
        info!(denom = %denom, rate = %rate, "exchange rate updated");
        self.emit(OracleEvent::ExchangeRateUpdate {
            denom: denom.to_string(),
            exchange_rate: rate,
        });
        published.insert(denom.to_string(), rate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keeper::test_support::*;
    use oracle_store::{ExchangeRateStore, MissCounterStore, VoteStore};
    use oracle_types::{
        AggregateExchangeRatePrevote, AggregateExchangeRateVote, Denom, ExchangeRateTuple, VoteHash,
    };
    use std::sync::{Arc, Mutex};

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    fn params(denoms: &[&str]) -> OracleParams {
        let mut params = OracleParams::default();
        params.whitelist = denoms.iter().map(|d| Denom::new(*d, Dec::ZERO)).collect();
        params
    }

    fn cast(keeper: &TestKeeper, voter: &ValAddress, tuples: &[(&str, &str)]) {
        let tuples = tuples
            .iter()
            .map(|(d, r)| ExchangeRateTuple::new(*d, dec(r)))
            .collect();
        keeper
            .store()
            .set_aggregate_vote(&AggregateExchangeRateVote::new(tuples, voter.clone()))
            .unwrap();
    }

    #[test]
    fn only_last_block_of_period_tallies() {
        let params = params(&["usdr"]);
        let (keeper, vals) = keeper_with(1, params.clone());
        cast(&keeper, &vals[0], &[("usdr", "1700")]);
        assert!(!keeper.end_block(3, &params).unwrap().tallied);
        assert_eq!(keeper.store().iter_aggregate_votes().unwrap().len(), 1);

        let outcome = keeper.end_block(4, &params).unwrap();
        assert!(outcome.tallied);
        assert_eq!(outcome.published["usdr"], dec("1700"));
        assert!(keeper.store().iter_aggregate_votes().unwrap().is_empty());
    }

    #[test]
    fn nobody_voting_counts_a_miss_for_everyone() {
        let params = OracleParams::default();
        let (keeper, vals) = keeper_with(2, params.clone());
        keeper.store().set_exchange_rate("ukrw", dec("1300")).unwrap();

        let outcome = keeper.end_block(4, &params).unwrap();
        assert_eq!(outcome.reference_denom, None);
        assert!(outcome.published.is_empty());
        assert_eq!(outcome.missed.len(), 2);
        assert_eq!(keeper.store().get_miss_counter(&vals[0]).unwrap(), Some(1));
        // stale rates are never reused
        assert_eq!(keeper.store().get_exchange_rate("ukrw").unwrap(), None);
    }

    #[test]
    fn cross_rates_reproduce_agreeing_votes() {
        let params = params(&["ukrw", "uusd"]);
        let (keeper, vals) = keeper_with(2, params.clone());
        for v in &vals {
            cast(&keeper, v, &[("uusd", "1.00"), ("ukrw", "1300.00")]);
        }
        let outcome = keeper.end_block(4, &params).unwrap();
        assert_eq!(outcome.reference_denom.as_deref(), Some("ukrw"));
        assert_eq!(keeper.store().get_exchange_rate("ukrw").unwrap(), Some(dec("1300")));
        assert_eq!(keeper.store().get_exchange_rate("uusd").unwrap(), Some(dec("1")));
        assert!(outcome.missed.is_empty());
    }

    #[test]
    fn abstain_is_never_a_miss() {
        let params = params(&["ukrw", "uusd"]);
        let (keeper, vals) = keeper_with(3, params.clone());
        cast(&keeper, &vals[0], &[("uusd", "0.0"), ("ukrw", "1300")]);
        cast(&keeper, &vals[1], &[("uusd", "1"), ("ukrw", "1300")]);
        cast(&keeper, &vals[2], &[("uusd", "1"), ("ukrw", "1300")]);

        let outcome = keeper.end_block(4, &params).unwrap();
        assert!(outcome.missed.is_empty());
        assert_eq!(outcome.published["uusd"], dec("1"));
    }

    #[test]
    fn abstain_on_a_ballot_without_power_is_not_a_miss() {
        let params = params(&["ukrw", "uusd"]);
        let (keeper, vals) = keeper_with(3, params.clone());
        cast(&keeper, &vals[0], &[("ukrw", "1300"), ("uusd", "0")]);
        cast(&keeper, &vals[1], &[("ukrw", "1300")]);

        let outcome = keeper.end_block(4, &params).unwrap();
        assert_eq!(outcome.reference_denom.as_deref(), Some("ukrw"));
        assert!(!outcome.published.contains_key("uusd"));
        assert_eq!(outcome.missed, {
            let mut missed = vec![vals[1].clone(), vals[2].clone()];
            missed.sort();
            missed
        });
        assert_eq!(keeper.store().get_miss_counter(&vals[0]).unwrap(), None);
    }

    #[test]
    fn lone_unit_of_power_behind_an_abstain_is_published() {
        let params = params(&["ukrw"]);
        let (keeper, vals) = keeper_with_powers(&[1, 1], params.clone());
        cast(&keeper, &vals[0], &[("ukrw", "0")]);
        cast(&keeper, &vals[1], &[("ukrw", "1300")]);

        let outcome = keeper.end_block(4, &params).unwrap();
        assert_eq!(outcome.published["ukrw"], dec("1300"));
        assert_eq!(keeper.store().get_exchange_rate("ukrw").unwrap(), Some(dec("1300")));
        assert!(outcome.missed.is_empty());
    }

    #[test]
    fn below_threshold_ballot_is_not_published() {
        let params = params(&["usdr"]);
        let (keeper, vals) = keeper_with(3, params.clone());
        cast(&keeper, &vals[0], &[("usdr", "1700")]);
        let outcome = keeper.end_block(4, &params).unwrap();
        assert!(outcome.published.is_empty());
        assert_eq!(outcome.missed.len(), 3);
        assert_eq!(keeper.store().get_exchange_rate("usdr").unwrap(), None);
    }

    #[test]
    fn votes_for_non_targets_are_ignored() {
        let params = params(&["usdr"]);
        let (keeper, vals) = keeper_with(1, params.clone());
        cast(&keeper, &vals[0], &[("usdr", "1700"), ("ueur", "2")]);
        let outcome = keeper.end_block(4, &params).unwrap();
        assert_eq!(outcome.published.keys().collect::<Vec<_>>(), vec!["usdr"]);
    }

    #[test]
    fn outlier_misses_and_loses_reward() {
        let params = params(&["usdr"]);
        let (keeper, vals) = keeper_with(5, params.clone());
        for v in &vals[..4] {
            cast(&keeper, v, &[("usdr", "100")]);
        }
        cast(&keeper, &vals[4], &[("usdr", "130")]);
        let outcome = keeper.end_block(4, &params).unwrap();
        assert_eq!(outcome.missed, vec![vals[4].clone()]);
    }

    #[test]
    fn period_close_keeps_fresh_prevotes_and_emits_updates() {
        let params = params(&["usdr"]);
        let (mut keeper, vals) = keeper_with(1, params.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        keeper.subscribe(Box::new(move |event| {
            sink.lock().unwrap().push(event.kind());
        }));

        keeper
            .store()
            .set_aggregate_prevote(&AggregateExchangeRatePrevote {
                hash: VoteHash::new([9; 20]),
                voter: vals[0].clone(),
                submit_block: 3,
            })
            .unwrap();
        cast(&keeper, &vals[0], &[("usdr", "1700")]);
        keeper.end_block(4, &params).unwrap();

        assert!(keeper.store().get_aggregate_prevote(&vals[0]).unwrap().is_some());
        assert_eq!(*seen.lock().unwrap(), vec!["exchange_rate_update"]);
    }

    #[test]
    fn whitelist_change_applies_at_period_end() {
        let old = params(&["usdr"]);
        let (keeper, _) = keeper_with(1, old);
        let new = params(&["usdr", "ukrw"]);
        let outcome = keeper.end_block(4, &new).unwrap();
        assert!(outcome.vote_targets_updated);
        assert_eq!(keeper.vote_targets().unwrap().len(), 2);
    }

    #[test]
    fn slash_window_resets_counters() {
        let mut params = params(&["usdr"]);
        params.vote_period = 1;
        params.slash_window = 10;
        let (keeper, vals) = keeper_with(1, params.clone());
        for height in 0..9 {
            keeper.end_block(height, &params).unwrap();
        }
        assert_eq!(keeper.store().get_miss_counter(&vals[0]).unwrap(), Some(9));
        let outcome = keeper.end_block(9, &params).unwrap();
        assert!(outcome.slash_window_closed);
        assert_eq!(outcome.slashed, vec![vals[0].clone()]);
        assert!(keeper.store().iter_miss_counters().unwrap().is_empty());
    }
}
