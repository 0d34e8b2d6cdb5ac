//! Stateless message validation.
//!
//! Runs before a message touches any state. Stateful checks (feeder
//! authorization, prevote timing, hash match, vote targets) are done by the
//! engine's message handler.

use crate::error::TransactionError;
use crate::tuples::parse_exchange_rate_tuples;
use crate::OracleMsg;
use oracle_crypto::{decode_acc_address, decode_val_address};
use oracle_types::{AccAddress, ValAddress, VoteHash};

/// Longest accepted salt, in bytes.
pub const MAX_SALT_LEN: usize = 4;

/// Longest accepted exchange-rate tuple string, in bytes.
pub const MAX_EXCHANGE_RATES_LEN: usize = 4096;

/// Validate a message's structure: addresses, hash encoding, salt and tuples.
pub fn validate_basic(msg: &OracleMsg) -> Result<(), TransactionError> {
    match msg {
        OracleMsg::AggregateExchangeRatePrevote(prevote) => {
            check_acc(&prevote.feeder)?;
            check_val(&prevote.validator)?;
            VoteHash::from_hex(&prevote.hash).map_err(|e| TransactionError::InvalidHash {
                hash: prevote.hash.clone(),
                reason: e.to_string(),
            })?;
        }
        OracleMsg::AggregateExchangeRateVote(vote) => {
            check_acc(&vote.feeder)?;
            check_val(&vote.validator)?;
            if vote.salt.is_empty() || vote.salt.len() > MAX_SALT_LEN {
                return Err(TransactionError::InvalidSalt {
                    len: vote.salt.len(),
                });
            }
            if vote.exchange_rates.len() > MAX_EXCHANGE_RATES_LEN {
                return Err(TransactionError::ExchangeRatesTooLong {
                    len: vote.exchange_rates.len(),
                    max: MAX_EXCHANGE_RATES_LEN,
                });
            }
            parse_exchange_rate_tuples(&vote.exchange_rates)?;
        }
        OracleMsg::DelegateFeedConsent(consent) => {
            check_val(&consent.operator)?;
            check_acc(&consent.delegate)?;
        }
    }
    Ok(())
}

fn check_acc(address: &AccAddress) -> Result<(), TransactionError> {
    decode_acc_address(address)
        .map(|_| ())
        .ok_or_else(|| TransactionError::InvalidAddress(address.to_string()))
}

fn check_val(address: &ValAddress) -> Result<(), TransactionError> {
    decode_val_address(address)
        .map(|_| ())
        .ok_or_else(|| TransactionError::InvalidAddress(address.to_string()))
}
