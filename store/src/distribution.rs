use crate::StoreError;
use oracle_types::{Coins, ValAddress};

/// Book-keeping of validator rewards in the distribution module.
pub trait DistributionKeeper {
    /// Credit `rewards` to a validator's outstanding rewards.
    fn allocate_tokens_to_validator(
        &self,
        validator: &ValAddress,
        rewards: &Coins,
    ) -> Result<(), StoreError>;

    /// Name of the module account that holds allocated rewards.
    fn module_account(&self) -> &str;
}
