//! Oracle module parameters.
//!
//! Every field is governance-controlled. The Period Controller receives the
//! current record as an argument at each period boundary rather than reading
//! it from ambient state.

use crate::decimal::Dec;
use crate::denom::{validate_denom, Denom};
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const BLOCKS_PER_MINUTE: u64 = 10;
const BLOCKS_PER_WEEK: u64 = BLOCKS_PER_MINUTE * 60 * 24 * 7;
const BLOCKS_PER_YEAR: u64 = BLOCKS_PER_MINUTE * 60 * 24 * 365;

/// All parameters of the oracle module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleParams {
    /// Number of blocks in one voting period.
    pub vote_period: u64,

    /// Fraction of total bonded power a ballot needs to be tallied.
    pub vote_threshold: Dec,

    /// Width of the rewarded band around the weighted median, relative to it.
    pub reward_band: Dec,

    /// Number of blocks over which the reward pool is paid out.
    pub reward_distribution_window: u64,

    /// Denoms that must be voted on, with their tobin tax.
    pub whitelist: Vec<Denom>,

    /// Fraction of bonded tokens burned on a liveness slash.
    pub slash_fraction: Dec,

    /// Number of blocks per liveness evaluation window.
    pub slash_window: u64,

    /// Minimum ratio of valid votes per slash window.
    pub min_valid_per_window: Dec,
}

impl OracleParams {
    /// Production defaults.
    pub fn mainnet_defaults() -> Self {
        let tobin = Dec::with_prec(25, 4); // 0.25%
        Self {
            vote_period: BLOCKS_PER_MINUTE / 2,
            vote_threshold: Dec::with_prec(50, 2),
            reward_band: Dec::with_prec(2, 2),
            reward_distribution_window: BLOCKS_PER_YEAR,
            whitelist: vec![
                Denom::new("ukrw", tobin),
                Denom::new("umnt", tobin),
                Denom::new("usdr", tobin),
                Denom::new("uusd", tobin),
            ],
            slash_fraction: Dec::with_prec(1, 4),
            slash_window: BLOCKS_PER_WEEK,
            min_valid_per_window: Dec::with_prec(5, 2),
        }
    }

    /// Number of whole vote periods inside one slash window.
    pub fn vote_periods_per_window(&self) -> u64 {
        self.slash_window / self.vote_period.max(1)
    }

    /// Whether `height` is the last block of a vote period.
    pub fn is_vote_period_last_block(&self, height: u64) -> bool {
        is_period_last_block(height, self.vote_period)
    }

    /// Whether `height` is the last block of a slash window.
    pub fn is_slash_window_last_block(&self, height: u64) -> bool {
        is_period_last_block(height, self.slash_window)
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), TypesError> {
        let invalid = |msg: String| Err(TypesError::InvalidParams(msg));

        if self.vote_period == 0 {
            return invalid("vote period must be positive".into());
        }
        if self.vote_threshold <= Dec::with_prec(33, 2) || self.vote_threshold > Dec::ONE {
            return invalid(format!(
                "vote threshold must be in (0.33, 1], got {}",
                self.vote_threshold
            ));
        }
        if !in_unit_interval(self.reward_band) {
            return invalid(format!("reward band must be in [0, 1], got {}", self.reward_band));
        }
        if self.reward_distribution_window < self.vote_period {
            return invalid("reward distribution window must be at least one vote period".into());
        }
        if !in_unit_interval(self.slash_fraction) {
            return invalid(format!(
                "slash fraction must be in [0, 1], got {}",
                self.slash_fraction
            ));
        }
        if self.slash_window < self.vote_period {
            return invalid("slash window must be at least one vote period".into());
        }
        if !in_unit_interval(self.min_valid_per_window) {
            return invalid(format!(
                "min valid per window must be in [0, 1], got {}",
                self.min_valid_per_window
            ));
        }

        let mut seen = BTreeSet::new();
        for denom in &self.whitelist {
            validate_denom(&denom.name)?;
            if !seen.insert(denom.name.as_str()) {
                return invalid(format!("duplicate whitelist denom {}", denom.name));
            }
            if !in_unit_interval(denom.tobin_tax) {
                return invalid(format!(
                    "tobin tax for {} must be in [0, 1], got {}",
                    denom.name, denom.tobin_tax
                ));
            }
        }
        Ok(())
    }
}

/// Default is the mainnet configuration.
impl Default for OracleParams {
    fn default() -> Self {
        Self::mainnet_defaults()
    }
}

fn in_unit_interval(value: Dec) -> bool {
    !value.is_negative() && value <= Dec::ONE
}

fn is_period_last_block(height: u64, period: u64) -> bool {
    period != 0 && height % period == period - 1
}
