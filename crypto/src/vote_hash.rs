//! Commit hash for the prevote/vote handshake.
//!
//! A validator first publishes only `SHA-256("{salt}:{rates}:{validator}")`
//! truncated to 20 bytes, then reveals `salt` and `rates` in the next vote
//! period. Rates stay hidden until nobody can still copy them into a prevote.

use crate::hash::sha256_truncated;
use oracle_types::{ValAddress, VoteHash};

/// Build the commit hash for a future reveal.
pub fn vote_hash(salt: &str, exchange_rates: &str, validator: &ValAddress) -> VoteHash {
    let source = format!("{}:{}:{}", salt, exchange_rates, validator);
    VoteHash::new(sha256_truncated(source.as_bytes()))
}

/// Check a reveal against the committed hash.
pub fn verify_vote_hash(
    hash: &VoteHash,
    salt: &str,
    exchange_rates: &str,
    validator: &ValAddress,
) -> bool {
    vote_hash(salt, exchange_rates, validator) == *hash
}
