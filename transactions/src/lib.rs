//! Oracle message types and their stateless validation.
//!
//! Message types:
//! - **AggregateExchangeRatePrevote**: commit to a hash of the rates to be revealed next period
//! - **AggregateExchangeRateVote**: reveal the salt and rates matching the prior prevote
//! - **DelegateFeedConsent**: authorize another account to submit votes for a validator

pub mod delegate;
pub mod error;
pub mod prevote;
pub mod tuples;
pub mod validation;
pub mod vote;

pub use delegate::MsgDelegateFeedConsent;
pub use error::TransactionError;
pub use prevote::MsgAggregateExchangeRatePrevote;
pub use tuples::{format_exchange_rate_tuples, parse_exchange_rate_tuples};
pub use validation::validate_basic;
pub use vote::MsgAggregateExchangeRateVote;

use oracle_types::ValAddress;
use serde::{Deserialize, Serialize};

/// The unified message enum wrapping every oracle message kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleMsg {
    AggregateExchangeRatePrevote(MsgAggregateExchangeRatePrevote),
    AggregateExchangeRateVote(MsgAggregateExchangeRateVote),
    DelegateFeedConsent(MsgDelegateFeedConsent),
}

impl OracleMsg {
    /// Short name used in logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AggregateExchangeRatePrevote(_) => "aggregate_exchange_rate_prevote",
            Self::AggregateExchangeRateVote(_) => "aggregate_exchange_rate_vote",
            Self::DelegateFeedConsent(_) => "delegate_feed_consent",
        }
    }

    /// The validator the message acts on behalf of.
    pub fn validator(&self) -> &ValAddress {
        match self {
            Self::AggregateExchangeRatePrevote(msg) => &msg.validator,
            Self::AggregateExchangeRateVote(msg) => &msg.validator,
            Self::DelegateFeedConsent(msg) => &msg.operator,
        }
    }
}

impl From<MsgAggregateExchangeRatePrevote> for OracleMsg {
    fn from(msg: MsgAggregateExchangeRatePrevote) -> Self {
        Self::AggregateExchangeRatePrevote(msg)
    }
}

impl From<MsgAggregateExchangeRateVote> for OracleMsg {
    fn from(msg: MsgAggregateExchangeRateVote) -> Self {
        Self::AggregateExchangeRateVote(msg)
    }
}

impl From<MsgDelegateFeedConsent> for OracleMsg {
    fn from(msg: MsgDelegateFeedConsent) -> Self {
        Self::DelegateFeedConsent(msg)
    }
}
