//! Tobin taxes. The set of stored denoms is the current vote target set.

use crate::StoreError;
use oracle_types::Dec;

pub trait TobinTaxStore {
    fn get_tobin_tax(&self, denom: &str) -> Result<Option<Dec>, StoreError>;

    fn set_tobin_tax(&self, denom: &str, tax: Dec) -> Result<(), StoreError>;

    fn delete_tobin_tax(&self, denom: &str) -> Result<(), StoreError>;

    /// All taxes in denom order.
    fn iter_tobin_taxes(&self) -> Result<Vec<(String, Dec)>, StoreError>;
}
