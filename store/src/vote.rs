//! Aggregate prevotes and votes, at most one of each per validator.

use crate::StoreError;
use oracle_types::{AggregateExchangeRatePrevote, AggregateExchangeRateVote, ValAddress};

pub trait VoteStore {
    fn get_aggregate_prevote(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AggregateExchangeRatePrevote>, StoreError>;

    fn set_aggregate_prevote(&self, prevote: &AggregateExchangeRatePrevote)
        -> Result<(), StoreError>;

    fn delete_aggregate_prevote(&self, validator: &ValAddress) -> Result<(), StoreError>;

    /// All prevotes in validator-address order.
    fn iter_aggregate_prevotes(&self) -> Result<Vec<AggregateExchangeRatePrevote>, StoreError>;

    fn get_aggregate_vote(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AggregateExchangeRateVote>, StoreError>;

    fn set_aggregate_vote(&self, vote: &AggregateExchangeRateVote) -> Result<(), StoreError>;

    fn delete_aggregate_vote(&self, validator: &ValAddress) -> Result<(), StoreError>;

    /// All votes in validator-address order.
    fn iter_aggregate_votes(&self) -> Result<Vec<AggregateExchangeRateVote>, StoreError>;
}
