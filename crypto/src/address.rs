//! Account and validator address encoding.
//!
//! Address format: prefix + base32(key, 32 chars) + base32(checksum, 8 chars)
//!
//! The key is the 20-byte hash of the owner's public key. Checksum: first
//! 5 bytes of Blake2b-256(key). Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz`.
//! An operator's account address (`orc1…`) and validator address
//! (`orcvaloper1…`) encode the same key.

use oracle_types::{AccAddress, TypesError, ValAddress};

/// Base32 alphabet (32 chars, avoids visually ambiguous 0/O, 2/Z, l/I, v).
const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Number of base32 characters for the key (160 bits → 32).
const KEY_CHARS: usize = 32;
/// Number of base32 characters for the checksum (40 bits → 8).
const CHECKSUM_CHARS: usize = 8;

/// Encode a byte slice as base32.
fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let num_chars = total_bits.div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode a base32 string into a fixed-size byte array. Returns `None` on
/// invalid characters or wrong length.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

fn encode(prefix: &str, key: &[u8; 20]) -> String {
    let checksum = &crate::blake2b_256(key)[..5];
    format!("{}{}{}", prefix, encode_base32(key), encode_base32(checksum))
}

fn decode(prefix: &str, address: &str) -> Option<[u8; 20]> {
    let encoded = address.strip_prefix(prefix)?;
    if encoded.len() != KEY_CHARS + CHECKSUM_CHARS {
        return None;
    }
    let key: [u8; 20] = decode_base32_fixed(encoded.get(..KEY_CHARS)?)?;
    let checksum: [u8; 5] = decode_base32_fixed(encoded.get(KEY_CHARS..)?)?;
    if checksum[..] != crate::blake2b_256(&key)[..5] {
        return None;
    }
    Some(key)
}

/// Derive the 20-byte address key from public key material.
pub fn key_hash(public_key: &[u8]) -> [u8; 20] {
    let hash = crate::blake2b_256(public_key);
    let mut key = [0u8; 20];
    key.copy_from_slice(&hash[..20]);
    key
}

pub fn acc_address_from_key(key: &[u8; 20]) -> AccAddress {
    AccAddress::new(encode(AccAddress::PREFIX, key))
}

pub fn val_address_from_key(key: &[u8; 20]) -> ValAddress {
    ValAddress::new(encode(ValAddress::PREFIX, key))
}

/// Extract the key bytes from an account address, checking prefix and checksum.
pub fn decode_acc_address(address: &AccAddress) -> Option<[u8; 20]> {
    decode(AccAddress::PREFIX, address.as_str())
}

/// Extract the key bytes from a validator address, checking prefix and checksum.
pub fn decode_val_address(address: &ValAddress) -> Option<[u8; 20]> {
    decode(ValAddress::PREFIX, address.as_str())
}

/// Parse untrusted input into an account address.
pub fn parse_acc_address(s: &str) -> Result<AccAddress, TypesError> {
    let address = AccAddress::new(s);
    decode_acc_address(&address)
        .map(|_| address)
        .ok_or_else(|| TypesError::InvalidAddress(s.to_string()))
}

/// Parse untrusted input into a validator address.
pub fn parse_val_address(s: &str) -> Result<ValAddress, TypesError> {
    let address = ValAddress::new(s);
    decode_val_address(&address)
        .map(|_| address)
        .ok_or_else(|| TypesError::InvalidAddress(s.to_string()))
}

/// The account address sharing a validator operator's key.
pub fn val_to_acc(validator: &ValAddress) -> Option<AccAddress> {
    decode_val_address(validator).map(|key| acc_address_from_key(&key))
}
