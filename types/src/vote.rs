//! Prevote and vote records.

use crate::address::ValAddress;
use crate::decimal::Dec;
use crate::hash::VoteHash;
use crate::BlockHeight;
use serde::{Deserialize, Serialize};

/// One `(denom, rate)` pair from a revealed vote. A zero rate is an abstain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateTuple {
    pub denom: String,
    pub exchange_rate: Dec,
}

impl ExchangeRateTuple {
    pub fn new(denom: impl Into<String>, exchange_rate: Dec) -> Self {
        Self {
            denom: denom.into(),
            exchange_rate,
        }
    }

    pub fn is_abstain(&self) -> bool {
        !self.exchange_rate.is_positive()
    }
}

/// The commitment a validator published in a prior vote period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateExchangeRatePrevote {
    pub hash: VoteHash,
    pub voter: ValAddress,
    pub submit_block: BlockHeight,
}

/// A revealed vote. Tuples are unique per denom and sorted by denom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateExchangeRateVote {
    pub exchange_rate_tuples: Vec<ExchangeRateTuple>,
    pub voter: ValAddress,
}

impl AggregateExchangeRateVote {
    pub fn new(mut exchange_rate_tuples: Vec<ExchangeRateTuple>, voter: ValAddress) -> Self {
        exchange_rate_tuples.sort_by(|a, b| a.denom.cmp(&b.denom));
        Self {
            exchange_rate_tuples,
            voter,
        }
    }
}
