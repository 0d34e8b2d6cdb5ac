//! Events emitted by message handling and the period controller.

use oracle_types::{AccAddress, Dec, ValAddress};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleEvent {
    /// A rate was published at the end of a vote period.
    ExchangeRateUpdate { denom: String, exchange_rate: Dec },
    /// A prevote was stored.
    AggregatePrevote {
        feeder: AccAddress,
        validator: ValAddress,
    },
    /// A vote was revealed and stored.
    AggregateVote {
        feeder: AccAddress,
        validator: ValAddress,
        exchange_rates: String,
    },
    /// A validator delegated its feeder rights.
    FeedDelegate {
        operator: ValAddress,
        delegate: AccAddress,
    },
}

impl OracleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExchangeRateUpdate { .. } => "exchange_rate_update",
            Self::AggregatePrevote { .. } => "aggregate_prevote",
            Self::AggregateVote { .. } => "aggregate_vote",
            Self::FeedDelegate { .. } => "feed_delegate",
        }
    }
}

/// Synchronous fan-out event bus for oracle events.
///
/// Listeners are invoked inline during block execution; keep them fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&OracleEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&OracleEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &OracleEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
