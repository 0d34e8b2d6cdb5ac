//! Read-only queries over oracle state.

use crate::error::OracleError;
use crate::keeper::OracleKeeper;
use oracle_crypto::val_to_acc;
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{
    AccAddress, AggregateExchangeRatePrevote, AggregateExchangeRateVote, Dec, ValAddress,
};

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// Published rate of `denom`. Errors if none was published last period.
    pub fn exchange_rate(&self, denom: &str) -> Result<Dec, OracleError> {
        self.store()
            .get_exchange_rate(denom)?
            .ok_or_else(|| OracleError::ExchangeRateNotFound(denom.to_string()))
    }

    pub fn exchange_rates(&self) -> Result<Vec<(String, Dec)>, OracleError> {
        Ok(self.store().iter_exchange_rates()?)
    }

    /// Denoms with a published rate.
    pub fn actives(&self) -> Result<Vec<String>, OracleError> {
        Ok(self
            .store()
            .iter_exchange_rates()?
            .into_iter()
            .map(|(denom, _)| denom)
            .collect())
    }

    pub fn tobin_tax(&self, denom: &str) -> Result<Dec, OracleError> {
        self.store()
            .get_tobin_tax(denom)?
            .ok_or_else(|| OracleError::UnknownDenom(denom.to_string()))
    }

    pub fn tobin_taxes(&self) -> Result<Vec<(String, Dec)>, OracleError> {
        Ok(self.store().iter_tobin_taxes()?)
    }

    /// The account feeding for `validator`, defaulting to its own account.
    pub fn feeder_delegation(&self, validator: &ValAddress) -> Result<AccAddress, OracleError> {
        match self.feeder_for(validator)? {
            Some(delegate) => Ok(delegate),
            None => val_to_acc(validator)
                .ok_or_else(|| OracleError::ValidatorNotFound(validator.to_string())),
        }
    }

    pub fn miss_counter(&self, validator: &ValAddress) -> Result<u64, OracleError> {
        Ok(self.store().get_miss_counter(validator)?.unwrap_or(0))
    }

    pub fn aggregate_prevote(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AggregateExchangeRatePrevote>, OracleError> {
        Ok(self.store().get_aggregate_prevote(validator)?)
    }

    pub fn aggregate_prevotes(&self) -> Result<Vec<AggregateExchangeRatePrevote>, OracleError> {
        Ok(self.store().iter_aggregate_prevotes()?)
    }

    pub fn aggregate_vote(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AggregateExchangeRateVote>, OracleError> {
        Ok(self.store().get_aggregate_vote(validator)?)
    }

    pub fn aggregate_votes(&self) -> Result<Vec<AggregateExchangeRateVote>, OracleError> {
        Ok(self.store().iter_aggregate_votes()?)
    }
}
