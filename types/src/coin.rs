//! Coin amounts held in module accounts and paid out as rewards.
//!
//! Amounts are integer raw units (u128); fractional rewards never exist
//! outside a `Dec` computation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single denom/amount pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins keyed by denom, iterated in denom order.
///
/// Zero amounts are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins(BTreeMap<String, u128>);

impl Coins {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a coin, saturating at `u128::MAX`.
    pub fn add(&mut self, coin: Coin) {
        if coin.is_zero() {
            return;
        }
        let entry = self.0.entry(coin.denom).or_insert(0);
        *entry = entry.saturating_add(coin.amount);
    }

    /// Add every coin of `other`.
    pub fn merge(&mut self, other: &Coins) {
        for coin in other.iter() {
            self.add(coin);
        }
    }

    /// Subtract, returning `None` (and leaving `self` untouched) if any denom
    /// would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut result = self.clone();
        for (denom, amount) in &other.0 {
            let have = result.0.get(denom).copied().unwrap_or(0);
            let left = have.checked_sub(*amount)?;
            if left == 0 {
                result.0.remove(denom);
            } else {
                result.0.insert(denom.clone(), left);
            }
        }
        Some(result)
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0
            .iter()
            .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        let mut coins = Coins::new();
        for coin in iter {
            coins.add(coin);
        }
        coins
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
