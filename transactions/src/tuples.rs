//! Exchange-rate tuple strings: `<decimal><denom>[,<decimal><denom>...]`.
//!
//! The decimal runs up to the first ASCII letter; the rest is the denom.
//! A zero rate is an abstain and parses like any other tuple.

use crate::error::TransactionError;
use oracle_types::{validate_denom, Dec, ExchangeRateTuple};
use std::collections::BTreeSet;

/// Parse a comma-separated tuple string.
///
/// Whitespace around each tuple is trimmed. Duplicate denoms, negative rates
/// and malformed decimals are rejected.
pub fn parse_exchange_rate_tuples(s: &str) -> Result<Vec<ExchangeRateTuple>, TransactionError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TransactionError::EmptyExchangeRates);
    }

    let mut seen = BTreeSet::new();
    let mut tuples = Vec::new();
    for raw in s.split(',') {
        let tuple = parse_tuple(raw.trim())?;
        if !seen.insert(tuple.denom.clone()) {
            return Err(TransactionError::DuplicateDenom(tuple.denom));
        }
        tuples.push(tuple);
    }
    Ok(tuples)
}

fn parse_tuple(raw: &str) -> Result<ExchangeRateTuple, TransactionError> {
    let malformed = |reason: &str| TransactionError::InvalidTuple {
        tuple: raw.to_string(),
        reason: reason.to_string(),
    };

    let split = raw
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| malformed("missing denom"))?;
    let (amount, denom) = raw.split_at(split);
    if amount.is_empty() {
        return Err(malformed("missing rate"));
    }

    let rate: Dec = amount
        .parse()
        .map_err(|e: oracle_types::TypesError| malformed(&e.to_string()))?;
    validate_denom(denom).map_err(|e| malformed(&e.to_string()))?;
    if rate.is_negative() {
        return Err(TransactionError::NegativeRate(denom.to_string()));
    }
    Ok(ExchangeRateTuple::new(denom, rate))
}

/// Render tuples in the form accepted by [`parse_exchange_rate_tuples`].
pub fn format_exchange_rate_tuples(tuples: &[ExchangeRateTuple]) -> String {
    tuples
        .iter()
        .map(|t| format!("{}{}", t.exchange_rate, t.denom))
        .collect::<Vec<_>>()
        .join(",")
}
