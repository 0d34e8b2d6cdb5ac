//! Tallying ballots: threshold checks, reference selection and win crediting.

use crate::ballot::{ExchangeRateBallot, VoteForTally};
use crate::claim::ClaimMap;
use oracle_types::{AggregateExchangeRateVote, Dec};
use std::collections::BTreeMap;

/// Tally one ballot and credit every winner in `claims`.
///
/// The spread around the weighted median is `median × reward_band / 2`, or
/// the ballot's standard deviation when that is larger. Votes inside the
/// spread win, and abstains always win. Returns the weighted median.
pub fn tally(ballot: &mut ExchangeRateBallot, reward_band: Dec, claims: &mut ClaimMap) -> Dec {
    if !ballot.is_sorted() {
        ballot.sort();
    }

    let median = ballot.weighted_median();
    let standard_deviation = ballot.standard_deviation(median);
    let spread = reward_spread(median, reward_band, standard_deviation);

    let low = median.checked_sub(spread).unwrap_or(Dec::ZERO);
    let high = median.checked_add(spread).unwrap_or(Dec::MAX);
    for vote in ballot.votes() {
        let in_band = vote.exchange_rate >= low && vote.exchange_rate <= high;
        if in_band || vote.is_abstain() {
            if let Some(claim) = claims.get_mut(&vote.voter) {
                claim.record_win(vote.power);
            }
        }
    }
    median
}

fn reward_spread(median: Dec, reward_band: Dec, standard_deviation: Dec) -> Dec {
    let band = reward_band
        .checked_quo_int(2)
        .and_then(|half| median.checked_mul(half))
        .unwrap_or(Dec::ZERO);
    band.max(standard_deviation)
}

/// Minimum ballot power for a ballot to count: `floor(total_power × vote_threshold)`.
pub fn threshold_power(total_power: u64, vote_threshold: Dec) -> u64 {
    Dec::from_u128(total_power as u128)
        .and_then(|total| total.checked_mul(vote_threshold))
        .map(|votes| votes.truncate_to_u128())
        .map(|votes| u64::try_from(votes).unwrap_or(u64::MAX))
        .unwrap_or(u64::MAX)
}

/// A ballot passes when it has non-zero power of at least `threshold`.
pub fn ballot_is_passing(ballot: &ExchangeRateBallot, threshold: u64) -> bool {
    let power = ballot.power();
    power > 0 && power >= threshold
}

/// Group every vote from a validator in `claims` into per-denom ballots.
///
/// Abstains carry zero power. Votes from validators outside `claims` are
/// ignored.
pub fn organize_ballots(
    votes: &[AggregateExchangeRateVote],
    claims: &ClaimMap,
) -> BTreeMap<String, ExchangeRateBallot> {
    let mut ballots: BTreeMap<String, ExchangeRateBallot> = BTreeMap::new();
    for vote in votes {
        let Some(claim) = claims.get(&vote.voter) else {
            continue;
        };
        for tuple in &vote.exchange_rate_tuples {
            let power = if tuple.is_abstain() { 0 } else { claim.power };
            ballots
                .entry(tuple.denom.clone())
                .or_default()
                .push(VoteForTally::new(
                    vote.voter.clone(),
                    &tuple.denom,
                    tuple.exchange_rate,
                    power,
                ));
        }
    }
    for ballot in ballots.values_mut() {
        ballot.sort();
    }
    ballots
}

/// Credit abstains on target ballots that will not be tallied.
///
/// A ballot below `threshold` is never tallied, so its abstains would
/// otherwise go unserved. Passing ballots credit theirs in [`tally`].
pub fn credit_unpassed_abstains(
    ballots: &BTreeMap<String, ExchangeRateBallot>,
    vote_targets: &BTreeMap<String, Dec>,
    threshold: u64,
    claims: &mut ClaimMap,
) {
    for (denom, ballot) in ballots {
        if !vote_targets.contains_key(denom) || ballot_is_passing(ballot, threshold) {
            continue;
        }
        for vote in ballot.votes().iter().filter(|v| v.is_abstain()) {
            if let Some(claim) = claims.get_mut(&vote.voter) {
                claim.record_win(0);
            }
        }
    }
}

/// Drop ballots for denoms outside `vote_targets` or below `threshold`, then
/// return the denom with the most ballot power. Ties go to the smallest
/// denom name. `None` if nothing passed.
pub fn pick_reference_denom(
    ballots: &mut BTreeMap<String, ExchangeRateBallot>,
    vote_targets: &BTreeMap<String, Dec>,
    threshold: u64,
) -> Option<String> {
    ballots.retain(|denom, ballot| {
        vote_targets.contains_key(denom) && ballot_is_passing(ballot, threshold)
    });

    let mut reference: Option<(&String, u64)> = None;
    // BTreeMap iterates in ascending denom order, so a strict `>` keeps the
    // alphabetically first denom on ties.
    for (denom, ballot) in ballots.iter() {
        let power = ballot.power();
        match reference {
            Some((_, best)) if power <= best => {}
            _ => reference = Some((denom, power)),
        }
    }
    reference.map(|(denom, _)| denom.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use oracle_types::{ExchangeRateTuple, ValAddress};

    fn val(n: u8) -> ValAddress {
        ValAddress::new(format!("orcvaloper1v{n}"))
    }

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    fn claims(powers: &[u64]) -> ClaimMap {
        powers
            .iter()
            .enumerate()
            .map(|(i, p)| (val(i as u8), Claim::new(val(i as u8), *p)))
            .collect()
    }

    fn vote(n: u8, tuples: &[(&str, &str)]) -> AggregateExchangeRateVote {
        AggregateExchangeRateVote::new(
            tuples
                .iter()
                .map(|(d, r)| ExchangeRateTuple::new(*d, dec(r)))
                .collect(),
            val(n),
        )
    }

    #[test]
    fn tally_credits_votes_inside_band() {
        let mut claims = claims(&[10, 10, 10, 10]);
        let mut ballot = ExchangeRateBallot::new(vec![
            VoteForTally::new(val(0), "uusd", dec("100"), 10),
            VoteForTally::new(val(1), "uusd", dec("100.5"), 10),
            VoteForTally::new(val(2), "uusd", dec("100"), 10),
            VoteForTally::new(val(3), "uusd", dec("0"), 0),
        ]);
        // median 100; the ±1 band covers 100.5 and the abstain always wins
        let median = tally(&mut ballot, dec("0.02"), &mut claims);
        assert_eq!(median, dec("100"));
        assert!(claims.values().all(|c| c.win_count == 1));
        assert_eq!(claims[&val(3)].weight, 0);
        assert_eq!(claims[&val(0)].weight, 10);
    }

    #[test]
    fn tally_excludes_outliers() {
        let mut claims = claims(&[10, 10, 10, 10, 10]);
        let rates = ["100", "100", "100", "100", "130"];
        let mut ballot: ExchangeRateBallot = rates
            .iter()
            .enumerate()
            .map(|(i, r)| VoteForTally::new(val(i as u8), "uusd", dec(r), 10))
            .collect();
        tally(&mut ballot, dec("0.02"), &mut claims);
        // sd = sqrt(900 / 5) ~ 13.4, so 130 falls outside the spread
        assert_eq!(claims[&val(4)].win_count, 0);
        assert_eq!(claims[&val(0)].win_count, 1);
    }

    #[test]
    fn threshold_is_floored() {
        assert_eq!(threshold_power(3, dec("0.5")), 1);
        assert_eq!(threshold_power(100, dec("0.5")), 50);
        assert_eq!(threshold_power(0, dec("0.5")), 0);
    }

    #[test]
    fn zero_power_ballot_never_passes() {
        let ballot = ExchangeRateBallot::new(vec![VoteForTally::new(val(0), "uusd", Dec::ZERO, 0)]);
        assert!(!ballot_is_passing(&ballot, 0));
    }

    #[test]
    fn organize_skips_unknown_voters_and_zeroes_abstains() {
        let claims = claims(&[10, 20]);
        let votes = vec![
            vote(0, &[("ukrw", "1300"), ("uusd", "0")]),
            vote(1, &[("ukrw", "1301")]),
            vote(9, &[("ukrw", "1")]),
        ];
        let ballots = organize_ballots(&votes, &claims);
        assert_eq!(ballots["ukrw"].len(), 2);
        assert_eq!(ballots["ukrw"].power(), 30);
        assert_eq!(ballots["uusd"].votes()[0].power, 0);
    }

    #[test]
    fn reference_prefers_power_then_name() {
        let claims = claims(&[10, 10]);
        let targets: BTreeMap<String, Dec> = ["ukrw", "umnt", "uusd"]
            .iter()
            .map(|d| (d.to_string(), Dec::ZERO))
            .collect();

        let votes = vec![
            vote(0, &[("ukrw", "1300"), ("umnt", "3"), ("uusd", "1")]),
            vote(1, &[("umnt", "3"), ("uusd", "1")]),
        ];
        let mut ballots = organize_ballots(&votes, &claims);
        assert_eq!(pick_reference_denom(&mut ballots, &targets, 10).as_deref(), Some("umnt"));
        assert_eq!(ballots.len(), 3);

        // ukrw alone falls below the threshold and is dropped
        let mut ballots = organize_ballots(&votes, &claims);
        assert_eq!(pick_reference_denom(&mut ballots, &targets, 11).as_deref(), Some("umnt"));
        assert!(!ballots.contains_key("ukrw"));
    }

    #[test]
    fn abstains_on_unpassed_ballots_are_credited() {
        let mut claims = claims(&[10, 10, 10]);
        let targets: BTreeMap<String, Dec> = ["ukrw", "uusd"]
            .iter()
            .map(|d| (d.to_string(), Dec::ZERO))
            .collect();
        let votes = vec![
            vote(0, &[("ukrw", "1300"), ("uusd", "0")]),
            vote(1, &[("ukrw", "1300"), ("ueur", "0")]),
        ];
        let ballots = organize_ballots(&votes, &claims);
        credit_unpassed_abstains(&ballots, &targets, 15, &mut claims);

        // the all-abstain uusd ballot cannot pass; ueur is not a target
        assert_eq!(claims[&val(0)].win_count, 1);
        assert_eq!(claims[&val(0)].weight, 0);
        assert_eq!(claims[&val(1)].win_count, 0);
        assert_eq!(claims[&val(2)].win_count, 0);
    }

    #[test]
    fn abstains_on_passing_ballots_are_left_to_tally() {
        let mut claims = claims(&[10, 10]);
        let targets: BTreeMap<String, Dec> = [("uusd".to_string(), Dec::ZERO)].into_iter().collect();
        let votes = vec![vote(0, &[("uusd", "1")]), vote(1, &[("uusd", "0")])];
        let ballots = organize_ballots(&votes, &claims);
        credit_unpassed_abstains(&ballots, &targets, 10, &mut claims);
        assert!(claims.values().all(|c| c.win_count == 0));
    }

    #[test]
    fn reference_ignores_non_targets_and_empty() {
        let claims = claims(&[10]);
        let targets: BTreeMap<String, Dec> = [("uusd".to_string(), Dec::ZERO)].into_iter().collect();
        let mut ballots = organize_ballots(&[vote(0, &[("ueur", "1")])], &claims);
        assert_eq!(pick_reference_denom(&mut ballots, &targets, 0), None);
        assert!(ballots.is_empty());
    }
}
