//! Cryptographic primitives for the exchange-rate oracle.
//!
//! - **Blake2b** for address checksums and key hashing
//! - **SHA-256** (truncated to 20 bytes) for prevote commit hashes
//! - Address encoding with `orc1` / `orcvaloper1` prefixes and base32

pub mod address;
pub mod hash;
pub mod vote_hash;

pub use address::{
    acc_address_from_key, decode_acc_address, decode_val_address, key_hash, parse_acc_address,
    parse_val_address, val_address_from_key, val_to_acc,
};
pub use hash::{blake2b_256, blake2b_256_multi, sha256, sha256_truncated};
pub use vote_hash::{verify_vote_hash, vote_hash};
