//! Genesis import and export.

use crate::error::{GenesisError, OracleError};
use crate::keeper::OracleKeeper;
use oracle_crypto::{decode_val_address, parse_acc_address, parse_val_address};
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_types::{
    validate_denom, AggregateExchangeRatePrevote, AggregateExchangeRateVote, Dec, OracleParams,
    ValAddress,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederDelegation {
    pub feeder_address: String,
    pub validator_address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateEntry {
    pub denom: String,
    pub exchange_rate: Dec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissCounterEntry {
    pub validator_address: String,
    pub miss_counter: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TobinTaxEntry {
    pub denom: String,
    pub tobin_tax: Dec,
}

/// Full oracle state as dumped to and loaded from a genesis file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: OracleParams,
    #[serde(default)]
    pub feeder_delegations: Vec<FeederDelegation>,
    #[serde(default)]
    pub exchange_rates: Vec<ExchangeRateEntry>,
    #[serde(default)]
    pub miss_counters: Vec<MissCounterEntry>,
    #[serde(default)]
    pub aggregate_exchange_rate_prevotes: Vec<AggregateExchangeRatePrevote>,
    #[serde(default)]
    pub aggregate_exchange_rate_votes: Vec<AggregateExchangeRateVote>,
    /// Vote targets. When empty, they are seeded from the whitelist.
    #[serde(default)]
    pub tobin_taxes: Vec<TobinTaxEntry>,
}

impl GenesisState {
    pub fn from_json(json: &str) -> Result<Self, GenesisError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GenesisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stateless checks: params, denoms and duplicate keys.
    pub fn validate(&self) -> Result<(), GenesisError> {
        self.params.validate()?;

        let mut denoms = BTreeSet::new();
        for entry in &self.exchange_rates {
            validate_denom(&entry.denom)?;
            if !denoms.insert(entry.denom.as_str()) {
                return Err(GenesisError::Duplicate(format!("exchange rate {}", entry.denom)));
            }
        }
        let mut denoms = BTreeSet::new();
        for entry in &self.tobin_taxes {
            validate_denom(&entry.denom)?;
            if !denoms.insert(entry.denom.as_str()) {
                return Err(GenesisError::Duplicate(format!("tobin tax {}", entry.denom)));
            }
        }
        let mut validators = BTreeSet::new();
        for entry in &self.feeder_delegations {
            if !validators.insert(entry.validator_address.as_str()) {
                return Err(GenesisError::Duplicate(format!(
                    "feeder delegation {}",
                    entry.validator_address
                )));
            }
        }
        Ok(())
    }
}

fn val_address(raw: &str) -> Result<ValAddress, GenesisError> {
    parse_val_address(raw).map_err(|_| GenesisError::InvalidAddress(raw.to_string()))
}

fn check_val_address(address: &ValAddress) -> Result<(), GenesisError> {
    decode_val_address(address)
        .map(|_| ())
        .ok_or_else(|| GenesisError::InvalidAddress(address.to_string()))
}

impl<S, K, D, B> OracleKeeper<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    /// Load `genesis` into an empty store.
    ///
    /// Every address is checked before anything is written; a malformed one
    /// aborts the import.
    pub fn init_genesis(&self, genesis: &GenesisState) -> Result<(), GenesisError> {
        genesis.validate()?;

        let mut delegations = Vec::with_capacity(genesis.feeder_delegations.len());
        for entry in &genesis.feeder_delegations {
            let validator = val_address(&entry.validator_address)?;
            let feeder = parse_acc_address(&entry.feeder_address)
                .map_err(|_| GenesisError::InvalidAddress(entry.feeder_address.clone()))?;
            delegations.push((validator, feeder));
        }
        let mut miss_counters = Vec::with_capacity(genesis.miss_counters.len());
        for entry in &genesis.miss_counters {
            miss_counters.push((val_address(&entry.validator_address)?, entry.miss_counter));
        }
        for prevote in &genesis.aggregate_exchange_rate_prevotes {
            check_val_address(&prevote.voter)?;
        }
        for vote in &genesis.aggregate_exchange_rate_votes {
            check_val_address(&vote.voter)?;
        }

        let store = self.store();
        for (validator, feeder) in &delegations {
            store.set_feeder_delegation(validator, feeder)?;
        }
        for entry in &genesis.exchange_rates {
            store.set_exchange_rate(&entry.denom, entry.exchange_rate)?;
        }
        for (validator, count) in &miss_counters {
            store.set_miss_counter(validator, *count)?;
        }
        for prevote in &genesis.aggregate_exchange_rate_prevotes {
            store.set_aggregate_prevote(prevote)?;
        }
        for vote in &genesis.aggregate_exchange_rate_votes {
            store.set_aggregate_vote(&AggregateExchangeRateVote::new(
                vote.exchange_rate_tuples.clone(),
                vote.voter.clone(),
            ))?;
        }
        if genesis.tobin_taxes.is_empty() {
            for denom in &genesis.params.whitelist {
                store.set_tobin_tax(&denom.name, denom.tobin_tax)?;
            }
        } else {
            for entry in &genesis.tobin_taxes {
                store.set_tobin_tax(&entry.denom, entry.tobin_tax)?;
            }
        }
        store.set_params(&genesis.params)?;

        info!(
            delegations = delegations.len(),
            rates = genesis.exchange_rates.len(),
            prevotes = genesis.aggregate_exchange_rate_prevotes.len(),
            votes = genesis.aggregate_exchange_rate_votes.len(),
            "oracle genesis loaded"
        );
        Ok(())
    }

    /// Dump the full oracle state, every collection in key order.
    pub fn export_genesis(&self) -> Result<GenesisState, OracleError> {
        let store = self.store();
        Ok(GenesisState {
            params: self.params()?,
            feeder_delegations: store
                .iter_feeder_delegations()?
                .into_iter()
                .map(|(validator, feeder)| FeederDelegation {
                    feeder_address: feeder.to_string(),
                    validator_address: validator.to_string(),
                })
                .collect(),
            exchange_rates: store
                .iter_exchange_rates()?
                .into_iter()
                .map(|(denom, exchange_rate)| ExchangeRateEntry {
                    denom,
                    exchange_rate,
                })
                .collect(),
            miss_counters: store
                .iter_miss_counters()?
                .into_iter()
                .map(|(validator, miss_counter)| MissCounterEntry {
                    validator_address: validator.to_string(),
                    miss_counter,
                })
                .collect(),
            aggregate_exchange_rate_prevotes: store.iter_aggregate_prevotes()?,
            aggregate_exchange_rate_votes: store.iter_aggregate_votes()?,
            tobin_taxes: store
                .iter_tobin_taxes()?
                .into_iter()
                .map(|(denom, tobin_tax)| TobinTaxEntry { denom, tobin_tax })
                .collect(),
        })
    }
}
