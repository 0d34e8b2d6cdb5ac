//! Nullable store: in-memory key-value storage for testing.
//!
//! Records are bincode-encoded under `prefix || key` byte keys, the same
//! layout a persistent backend would use, so iteration order matches it.

use oracle_store::{
    ExchangeRateStore, FeederDelegationStore, MissCounterStore, ParamsStore, StoreError,
    TobinTaxStore, VoteStore,
};
use oracle_types::{
    AccAddress, AggregateExchangeRatePrevote, AggregateExchangeRateVote, Dec, OracleParams,
    ValAddress,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

const EXCHANGE_RATE_PREFIX: u8 = 0x01;
const FEEDER_DELEGATION_PREFIX: u8 = 0x02;
const MISS_COUNTER_PREFIX: u8 = 0x03;
const AGGREGATE_PREVOTE_PREFIX: u8 = 0x04;
const AGGREGATE_VOTE_PREFIX: u8 = 0x05;
const TOBIN_TAX_PREFIX: u8 = 0x06;
const PARAMS_KEY: &[u8] = &[0x07];

type Kv = BTreeMap<Vec<u8>, Vec<u8>>;

/// An in-memory oracle store for testing.
/// Thread-safe so a single instance can be shared across test harnesses.
pub struct NullOracleStore {
    kv: Mutex<Kv>,
}

impl NullOracleStore {
    pub fn new() -> Self {
        Self {
            kv: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of raw entries, across all prefixes.
    pub fn len(&self) -> usize {
        self.kv.lock().map(|kv| kv.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Kv>, StoreError> {
        self.kv
            .lock()
            .map_err(|_| StoreError::Backend("null store mutex poisoned".into()))
    }

    fn put<T: Serialize>(&self, key: Vec<u8>, value: &T) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.lock()?.insert(key, bytes);
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.lock()?.get(key) {
            Some(bytes) => bincode::deserialize(bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    /// Decode every entry under `prefix`, returning the key suffix as a string.
    fn iter_prefix<T: DeserializeOwned>(&self, prefix: u8) -> Result<Vec<(String, T)>, StoreError> {
        let kv = self.lock()?;
        let mut out = Vec::new();
        for (key, bytes) in kv.range(vec![prefix]..vec![prefix + 1]) {
            let suffix = std::str::from_utf8(&key[1..])
                .map_err(|e| StoreError::Corruption(e.to_string()))?;
            let value =
                bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
            out.push((suffix.to_string(), value));
        }
        Ok(out)
    }
}

impl Default for NullOracleStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(prefix: u8, suffix: &str) -> Vec<u8> {
    let mut k = Vec::with_capacity(1 + suffix.len());
    k.push(prefix);
    k.extend_from_slice(suffix.as_bytes());
    k
}

impl ExchangeRateStore for NullOracleStore {
    fn get_exchange_rate(&self, denom: &str) -> Result<Option<Dec>, StoreError> {
        self.get(&key(EXCHANGE_RATE_PREFIX, denom))
    }

    fn set_exchange_rate(&self, denom: &str, rate: Dec) -> Result<(), StoreError> {
        self.put(key(EXCHANGE_RATE_PREFIX, denom), &rate)
    }

    fn delete_exchange_rate(&self, denom: &str) -> Result<(), StoreError> {
        self.delete(&key(EXCHANGE_RATE_PREFIX, denom))
    }

    fn iter_exchange_rates(&self) -> Result<Vec<(String, Dec)>, StoreError> {
        self.iter_prefix(EXCHANGE_RATE_PREFIX)
    }
}

impl FeederDelegationStore for NullOracleStore {
    fn get_feeder_delegation(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AccAddress>, StoreError> {
        self.get(&key(FEEDER_DELEGATION_PREFIX, validator.as_str()))
    }

    fn set_feeder_delegation(
        &self,
        validator: &ValAddress,
        delegate: &AccAddress,
    ) -> Result<(), StoreError> {
        self.put(key(FEEDER_DELEGATION_PREFIX, validator.as_str()), delegate)
    }

    fn iter_feeder_delegations(&self) -> Result<Vec<(ValAddress, AccAddress)>, StoreError> {
        Ok(self
            .iter_prefix(FEEDER_DELEGATION_PREFIX)?
            .into_iter()
            .map(|(val, delegate)| (ValAddress::new(val), delegate))
            .collect())
    }
}

impl MissCounterStore for NullOracleStore {
    fn get_miss_counter(&self, validator: &ValAddress) -> Result<Option<u64>, StoreError> {
        self.get(&key(MISS_COUNTER_PREFIX, validator.as_str()))
    }

    fn set_miss_counter(&self, validator: &ValAddress, count: u64) -> Result<(), StoreError> {
        self.put(key(MISS_COUNTER_PREFIX, validator.as_str()), &count)
    }

    fn delete_miss_counter(&self, validator: &ValAddress) -> Result<(), StoreError> {
        self.delete(&key(MISS_COUNTER_PREFIX, validator.as_str()))
    }

    fn iter_miss_counters(&self) -> Result<Vec<(ValAddress, u64)>, StoreError> {
        Ok(self
            .iter_prefix(MISS_COUNTER_PREFIX)?
            .into_iter()
            .map(|(val, count)| (ValAddress::new(val), count))
            .collect())
    }
}

impl ParamsStore for NullOracleStore {
    fn get_params(&self) -> Result<Option<OracleParams>, StoreError> {
        self.get(PARAMS_KEY)
    }

    fn set_params(&self, params: &OracleParams) -> Result<(), StoreError> {
        self.put(PARAMS_KEY.to_vec(), params)
    }
}

impl TobinTaxStore for NullOracleStore {
    fn get_tobin_tax(&self, denom: &str) -> Result<Option<Dec>, StoreError> {
        self.get(&key(TOBIN_TAX_PREFIX, denom))
    }

    fn set_tobin_tax(&self, denom: &str, tax: Dec) -> Result<(), StoreError> {
        self.put(key(TOBIN_TAX_PREFIX, denom), &tax)
    }

    fn delete_tobin_tax(&self, denom: &str) -> Result<(), StoreError> {
        self.delete(&key(TOBIN_TAX_PREFIX, denom))
    }

    fn iter_tobin_taxes(&self) -> Result<Vec<(String, Dec)>, StoreError> {
        self.iter_prefix(TOBIN_TAX_PREFIX)
    }
}

impl VoteStore for NullOracleStore {
    fn get_aggregate_prevote(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AggregateExchangeRatePrevote>, StoreError> {
        self.get(&key(AGGREGATE_PREVOTE_PREFIX, validator.as_str()))
    }

    fn set_aggregate_prevote(
        &self,
        prevote: &AggregateExchangeRatePrevote,
    ) -> Result<(), StoreError> {
        self.put(key(AGGREGATE_PREVOTE_PREFIX, prevote.voter.as_str()), prevote)
    }

    fn delete_aggregate_prevote(&self, validator: &ValAddress) -> Result<(), StoreError> {
        self.delete(&key(AGGREGATE_PREVOTE_PREFIX, validator.as_str()))
    }

    fn iter_aggregate_prevotes(&self) -> Result<Vec<AggregateExchangeRatePrevote>, StoreError> {
        Ok(self
            .iter_prefix(AGGREGATE_PREVOTE_PREFIX)?
            .into_iter()
            .map(|(_, prevote)| prevote)
            .collect())
    }

    fn get_aggregate_vote(
        &self,
        validator: &ValAddress,
    ) -> Result<Option<AggregateExchangeRateVote>, StoreError> {
        self.get(&key(AGGREGATE_VOTE_PREFIX, validator.as_str()))
    }

    fn set_aggregate_vote(&self, vote: &AggregateExchangeRateVote) -> Result<(), StoreError> {
        self.put(key(AGGREGATE_VOTE_PREFIX, vote.voter.as_str()), vote)
    }

    fn delete_aggregate_vote(&self, validator: &ValAddress) -> Result<(), StoreError> {
        self.delete(&key(AGGREGATE_VOTE_PREFIX, validator.as_str()))
    }

    fn iter_aggregate_votes(&self) -> Result<Vec<AggregateExchangeRateVote>, StoreError> {
        Ok(self
            .iter_prefix(AGGREGATE_VOTE_PREFIX)?
            .into_iter()
            .map(|(_, vote)| vote)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_types::{ExchangeRateTuple, VoteHash};

    fn val(name: &str) -> ValAddress {
        ValAddress::new(format!("orcvaloper1{name}"))
    }

    #[test]
    fn exchange_rates_round_trip_in_denom_order() {
        let store = NullOracleStore::new();
        store.set_exchange_rate("uusd", Dec::ONE).unwrap();
        store.set_exchange_rate("ukrw", Dec::from_int(1300)).unwrap();
        assert_eq!(store.get_exchange_rate("ukrw").unwrap(), Some(Dec::from_int(1300)));

        let all = store.iter_exchange_rates().unwrap();
        let denoms: Vec<&str> = all.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(denoms, vec!["ukrw", "uusd"]);

        store.delete_exchange_rate("ukrw").unwrap();
        assert_eq!(store.get_exchange_rate("ukrw").unwrap(), None);
    }

    #[test]
    fn prefixes_do_not_bleed() {
        let store = NullOracleStore::new();
        store.set_exchange_rate("ukrw", Dec::ONE).unwrap();
        store.set_tobin_tax("ukrw", Dec::with_prec(25, 4)).unwrap();
        store.set_miss_counter(&val("a"), 3).unwrap();
        assert_eq!(store.iter_exchange_rates().unwrap().len(), 1);
        assert_eq!(store.iter_tobin_taxes().unwrap().len(), 1);
        assert_eq!(store.iter_miss_counters().unwrap(), vec![(val("a"), 3)]);
    }

    #[test]
    fn one_prevote_and_vote_per_validator() {
        let store = NullOracleStore::new();
        let first = AggregateExchangeRatePrevote {
            hash: VoteHash::new([1; 20]),
            voter: val("a"),
            submit_block: 1,
        };
        let second = AggregateExchangeRatePrevote {
            hash: VoteHash::new([2; 20]),
            voter: val("a"),
            submit_block: 2,
        };
        store.set_aggregate_prevote(&first).unwrap();
        store.set_aggregate_prevote(&second).unwrap();
        assert_eq!(store.iter_aggregate_prevotes().unwrap(), vec![second]);

        let vote = AggregateExchangeRateVote::new(
            vec![ExchangeRateTuple::new("ukrw", Dec::ONE)],
            val("a"),
        );
        store.set_aggregate_vote(&vote).unwrap();
        store.set_aggregate_vote(&vote).unwrap();
        assert_eq!(store.iter_aggregate_votes().unwrap().len(), 1);
        store.delete_aggregate_vote(&val("a")).unwrap();
        assert!(store.get_aggregate_vote(&val("a")).unwrap().is_none());
    }

    #[test]
    fn params_round_trip() {
        let store = NullOracleStore::new();
        assert!(store.get_params().unwrap().is_none());
        let params = OracleParams::default();
        store.set_params(&params).unwrap();
        assert_eq!(store.get_params().unwrap(), Some(params));
    }
}
