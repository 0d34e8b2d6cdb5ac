//! Per-denom ballots and the statistics tallied over them.

use oracle_types::{Dec, ValAddress};
use std::collections::BTreeMap;

/// A single validator's rate for one denom, with the power it carries.
///
/// Abstain votes (rate ≤ 0) carry zero power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteForTally {
    pub voter: ValAddress,
    pub denom: String,
    pub exchange_rate: Dec,
    pub power: u64,
}

impl VoteForTally {
    pub fn new(voter: ValAddress, denom: impl Into<String>, exchange_rate: Dec, power: u64) -> Self {
        Self {
            voter,
            denom: denom.into(),
            exchange_rate,
            power,
        }
    }

    pub fn is_abstain(&self) -> bool {
        !self.exchange_rate.is_positive()
    }
}

/// Votes for one denom, kept sorted ascending by rate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeRateBallot {
    votes: Vec<VoteForTally>,
}

impl ExchangeRateBallot {
    /// Build a ballot, sorting the votes ascending by rate.
    pub fn new(votes: Vec<VoteForTally>) -> Self {
        let mut ballot = Self { votes };
        ballot.sort();
        ballot
    }

    /// Append a vote. The ballot must be re-sorted before tallying.
    pub fn push(&mut self, vote: VoteForTally) {
        self.votes.push(vote);
    }

    /// Stable sort by rate; equal rates keep insertion order.
    pub fn sort(&mut self) {
        self.votes.sort_by(|a, b| a.exchange_rate.cmp(&b.exchange_rate));
    }

    pub fn is_sorted(&self) -> bool {
        self.votes
            .windows(2)
            .all(|w| w[0].exchange_rate <= w[1].exchange_rate)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn votes(&self) -> &[VoteForTally] {
        &self.votes
    }

    /// Total power of the ballot. Abstains contribute nothing.
    pub fn power(&self) -> u64 {
        self.votes
            .iter()
            .filter(|v| !v.is_abstain())
            .fold(0u64, |acc, v| acc.saturating_add(v.power))
    }

    /// Rate of the first vote at which cumulative power reaches half of the
    /// ballot's power. Abstains are never the median. Zero for a ballot
    /// without power. Assumes the ballot is sorted.
    pub fn weighted_median(&self) -> Dec {
        let total = self.power() as u128;
        if total == 0 {
            return Dec::ZERO;
        }
        let mut pivot = 0u128;
        for vote in self.votes.iter().filter(|v| !v.is_abstain()) {
            pivot += vote.power as u128;
            if pivot * 2 >= total {
                return vote.exchange_rate;
            }
        }
        Dec::ZERO
    }

    /// Power-weighted standard deviation of the rates about `median`.
    ///
    /// Abstains take part with their zero power. Returns zero for a ballot
    /// without power or when the weighted squares do not fit the decimal
    /// range.
    pub fn standard_deviation(&self, median: Dec) -> Dec {
        let total = self.power();
        if total == 0 {
            return Dec::ZERO;
        }
        self.variance(median, total)
            .and_then(|variance| variance.sqrt())
            .unwrap_or(Dec::ZERO)
    }

    fn variance(&self, median: Dec, total_power: u64) -> Option<Dec> {
        let mut sum = Dec::ZERO;
        for vote in &self.votes {
            let deviation = vote.exchange_rate.checked_sub(median)?;
            let weighted = deviation
                .checked_mul(deviation)?
                .checked_mul_int(vote.power as i128)?;
            sum = sum.checked_add(weighted)?;
        }
        sum.checked_quo_int(total_power as i128)
    }

    /// Rates keyed by voter, abstains included.
    pub fn to_map(&self) -> BTreeMap<ValAddress, Dec> {
        self.votes
            .iter()
            .map(|v| (v.voter.clone(), v.exchange_rate))
            .collect()
    }

    /// Express every vote relative to the voter's reference-denom rate.
    ///
    /// A vote becomes `reference_rate / own_rate`, keeping its power. Voters
    /// absent from `reference` are dropped. A vote turns into an abstain
    /// when either rate is not positive or the quotient does not fit.
    pub fn to_cross_rate(&self, reference: &BTreeMap<ValAddress, Dec>) -> ExchangeRateBallot {
        let votes = self
            .votes
            .iter()
            .filter_map(|vote| {
                let reference_rate = reference.get(&vote.voter)?;
                let cross = if vote.is_abstain() || !reference_rate.is_positive() {
                    None
                } else {
                    reference_rate.checked_quo(vote.exchange_rate)
                };
                Some(match cross {
                    Some(rate) => VoteForTally::new(vote.voter.clone(), &vote.denom, rate, vote.power),
                    None => VoteForTally::new(vote.voter.clone(), &vote.denom, Dec::ZERO, 0),
                })
            })
            .collect();
        ExchangeRateBallot::new(votes)
    }
}

impl FromIterator<VoteForTally> for ExchangeRateBallot {
    fn from_iter<I: IntoIterator<Item = VoteForTally>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
