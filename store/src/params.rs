use crate::StoreError;
use oracle_types::OracleParams;

/// The single module parameter record.
pub trait ParamsStore {
    fn get_params(&self) -> Result<Option<OracleParams>, StoreError>;

    fn set_params(&self, params: &OracleParams) -> Result<(), StoreError>;
}
