//! Stateful handling of oracle messages.
//!
//! Every handler either fully applies or returns an error without touching
//! state.

use crate::error::OracleError;
use crate::events::OracleEvent;
use crate::keeper::OracleKeeper;
use oracle_crypto::{decode_acc_address, decode_val_address, verify_vote_hash};
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_transactions::{
    parse_exchange_rate_tuples, validate_basic, MsgAggregateExchangeRatePrevote,
    MsgAggregateExchangeRateVote, MsgDelegateFeedConsent, OracleMsg,
};
use oracle_types::{
    AccAddress, AggregateExchangeRatePrevote, AggregateExchangeRateVote, ValAddress, VoteHash,
};
use tracing::debug;

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// Validate and apply one message included at `height`.
    pub fn handle_msg(&self, height: u64, msg: &OracleMsg) -> Result<(), OracleError> {
        validate_basic(msg)?;
        match msg {
            OracleMsg::AggregateExchangeRatePrevote(m) => self.aggregate_exchange_rate_prevote(height, m),
            OracleMsg::AggregateExchangeRateVote(m) => self.aggregate_exchange_rate_vote(height, m),
            OracleMsg::DelegateFeedConsent(m) => self.delegate_feed_consent(m),
        }
    }

    /// The delegate registered to feed for `validator`, if any. The
    /// validator's own account may always feed.
    pub fn feeder_for(&self, validator: &ValAddress) -> Result<Option<AccAddress>, OracleError> {
        Ok(self.store().get_feeder_delegation(validator)?)
    }

    /// Check that `feeder` may vote for `validator` and that the validator is
    /// bonded.
    pub fn validate_feeder(&self, feeder: &AccAddress, validator: &ValAddress) -> Result<(), OracleError> {
        let own_account = match (decode_acc_address(feeder), decode_val_address(validator)) {
            (Some(f), Some(v)) => f == v,
            _ => false,
        };
        if !own_account {
            let delegate = self.feeder_for(validator)?;
            if delegate.as_ref() != Some(feeder) {
                return Err(OracleError::NoVotingPermission {
                    feeder: feeder.to_string(),
                    validator: validator.to_string(),
                });
            }
        }

        match self.staking().validator(validator)? {
            None => Err(OracleError::ValidatorNotFound(validator.to_string())),
            Some(info) if !info.bonded => Err(OracleError::ValidatorNotBonded(validator.to_string())),
            Some(_) => Ok(()),
        }
    }

    /// Store a prevote, replacing any earlier one from the same validator.
    pub fn aggregate_exchange_rate_prevote(
        &self,
        height: u64,
        msg: &MsgAggregateExchangeRatePrevote,
    ) -> Result<(), OracleError> {
        self.validate_feeder(&msg.feeder, &msg.validator)?;
        let hash = VoteHash::from_hex(&msg.hash)?;

        self.store().set_aggregate_prevote(&AggregateExchangeRatePrevote {
            hash,
            voter: msg.validator.clone(),
            submit_block: height,
        })?;
        debug!(validator = %msg.validator, height, "aggregate prevote stored");
        self.emit(OracleEvent::AggregatePrevote {
            feeder: msg.feeder.clone(),
            validator: msg.validator.clone(),
        });
        Ok(())
    }

    /// Reveal a vote against the validator's prevote from the previous period.
    pub fn aggregate_exchange_rate_vote(
        &self,
        height: u64,
        msg: &MsgAggregateExchangeRateVote,
    ) -> Result<(), OracleError> {
        self.validate_feeder(&msg.feeder, &msg.validator)?;
        let params = self.params()?;

        let prevote = self
            .store()
            .get_aggregate_prevote(&msg.validator)?
            .ok_or_else(|| OracleError::NoAggregatePrevote(msg.validator.to_string()))?;

        let vote_period = params.vote_period.max(1);
        if (height / vote_period).checked_sub(prevote.submit_block / vote_period) != Some(1) {
            return Err(OracleError::RevealPeriodMismatch {
                submit_block: prevote.submit_block,
                height,
                vote_period: params.vote_period,
            });
        }

        let tuples = parse_exchange_rate_tuples(&msg.exchange_rates)?;
        for tuple in &tuples {
            if !self.is_vote_target(&tuple.denom)? {
                return Err(OracleError::UnknownDenom(tuple.denom.clone()));
            }
        }

        if !verify_vote_hash(&prevote.hash, &msg.salt, &msg.exchange_rates, &msg.validator) {
            return Err(OracleError::VerificationFailed(msg.validator.to_string()));
        }

        self.store()
            .set_aggregate_vote(&AggregateExchangeRateVote::new(tuples, msg.validator.clone()))?;
        self.store().delete_aggregate_prevote(&msg.validator)?;
        debug!(validator = %msg.validator, height, "aggregate vote revealed");
        self.emit(OracleEvent::AggregateVote {
            feeder: msg.feeder.clone(),
            validator: msg.validator.clone(),
            exchange_rates: msg.exchange_rates.clone(),
        });
        Ok(())
    }

    /// Record `msg.delegate` as the feeder for `msg.operator`.
    pub fn delegate_feed_consent(&self, msg: &MsgDelegateFeedConsent) -> Result<(), OracleError> {
        if self.staking().validator(&msg.operator)?.is_none() {
            return Err(OracleError::ValidatorNotFound(msg.operator.to_string()));
        }
        self.store()
            .set_feeder_delegation(&msg.operator, &msg.delegate)?;
        debug!(operator = %msg.operator, delegate = %msg.delegate, "feeder delegated");
        self.emit(OracleEvent::FeedDelegate {
            operator: msg.operator.clone(),
            delegate: msg.delegate.clone(),
        });
        Ok(())
    }
}
