use crate::StoreError;
use oracle_types::{AccAddress, ValAddress};

/// Account authorized to submit votes on a validator's behalf.
pub trait FeederDelegationStore {
    fn get_feeder_delegation(&self, validator: &ValAddress)
        -> Result<Option<AccAddress>, StoreError>;

    fn set_feeder_delegation(
        &self,
        validator: &ValAddress,
        delegate: &AccAddress,
    ) -> Result<(), StoreError>;

    fn iter_feeder_delegations(&self) -> Result<Vec<(ValAddress, AccAddress)>, StoreError>;
}
