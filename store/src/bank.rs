use crate::StoreError;
use oracle_types::Coins;

/// Balance reads and module-to-module transfers.
pub trait BankKeeper {
    fn module_balance(&self, module: &str) -> Result<Coins, StoreError>;

    /// Move `coins` between module accounts. Fails without side effects on
    /// insufficient funds.
    fn send_coins_from_module_to_module(
        &self,
        from: &str,
        to: &str,
        coins: &Coins,
    ) -> Result<(), StoreError>;
}
