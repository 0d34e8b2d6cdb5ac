//! Nullable bank: module account balances held in memory.

use oracle_store::{BankKeeper, StoreError};
use oracle_types::{Coin, Coins};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory bank for testing.
pub struct NullBank {
    balances: Mutex<BTreeMap<String, Coins>>,
}

impl NullBank {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(BTreeMap::new()),
        }
    }

    /// Credit coins to a module account out of thin air.
    pub fn mint(&self, module: &str, coin: Coin) {
        self.balances
            .lock()
            .unwrap()
            .entry(module.to_string())
            .or_default()
            .add(coin);
    }

    pub fn balance(&self, module: &str, denom: &str) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(module)
            .map(|c| c.amount_of(denom))
            .unwrap_or(0)
    }
}

impl Default for NullBank {
    fn default() -> Self {
        Self::new()
    }
}

impl BankKeeper for NullBank {
    fn module_balance(&self, module: &str) -> Result<Coins, StoreError> {
        Ok(self
            .balances
            .lock()
            .map_err(|_| poisoned())?
            .get(module)
            .cloned()
            .unwrap_or_default())
    }

    fn send_coins_from_module_to_module(
        &self,
        from: &str,
        to: &str,
        coins: &Coins,
    ) -> Result<(), StoreError> {
        let mut balances = self.balances.lock().map_err(|_| poisoned())?;
        let have = balances.get(from).cloned().unwrap_or_default();
        let left = have.checked_sub(coins).ok_or_else(|| StoreError::Collaborator {
            module: "bank".into(),
            reason: format!("{from} has {have}, cannot send {coins}"),
        })?;
        balances.insert(from.to_string(), left);
        balances.entry(to.to_string()).or_default().merge(coins);
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("null bank mutex poisoned".into())
}
