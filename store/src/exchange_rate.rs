//! Published exchange rates, keyed by denom.

use crate::StoreError;
use oracle_types::Dec;

pub trait ExchangeRateStore {
    fn get_exchange_rate(&self, denom: &str) -> Result<Option<Dec>, StoreError>;

    fn set_exchange_rate(&self, denom: &str, rate: Dec) -> Result<(), StoreError>;

    fn delete_exchange_rate(&self, denom: &str) -> Result<(), StoreError>;

    /// All published rates in denom order.
    fn iter_exchange_rates(&self) -> Result<Vec<(String, Dec)>, StoreError>;
}
