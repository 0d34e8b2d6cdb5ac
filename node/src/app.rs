//! Block driver around the oracle keeper.
//!
//! The host delivers each block's messages in order, then runs the
//! end-block hook with the parameter record in force. A message that fails
//! its checks is rejected on its own and the block carries on; an error that
//! leaves the store in doubt aborts the block.

use oracle_engine::{GenesisState, OracleEvent, OracleKeeper, PeriodOutcome};
use oracle_nullables::{NullBank, NullDistribution, NullOracleStore, NullStaking};
use oracle_store::{BankKeeper, DistributionKeeper, OracleStore, StakingKeeper};
use oracle_transactions::OracleMsg;

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::tracing_spans;

/// Outcome of one delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResult {
    pub kind: &'static str,
    /// Rejection reason, `None` if the message was accepted.
    pub error: Option<String>,
}

impl TxResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of one applied block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockResult {
    pub height: u64,
    pub txs: Vec<TxResult>,
    pub end_block: PeriodOutcome,
}

impl BlockResult {
    pub fn accepted(&self) -> usize {
        self.txs.iter().filter(|tx| tx.is_ok()).count()
    }
}

/// Oracle application: the keeper plus the block height bookkeeping.
pub struct OracleApp<S, K, D, B> {
    keeper: OracleKeeper<S, K, D, B>,
    last_height: Option<u64>,
}

/// An app backed entirely by in-memory collaborators.
pub type InMemoryApp = OracleApp<NullOracleStore, NullStaking, NullDistribution, NullBank>;

impl InMemoryApp {
    /// In-memory app over the given staking set.
    pub fn in_memory(staking: NullStaking) -> Self {
        Self::new(OracleKeeper::new(
            NullOracleStore::new(),
            staking,
            NullDistribution::default(),
            NullBank::new(),
        ))
    }
}

impl<S, K, D, B> OracleApp<S, K, D, B>
where
    S: OracleStore,
    K: StakingKeeper,
    D: DistributionKeeper,
    B: BankKeeper,
{
    pub fn new(keeper: OracleKeeper<S, K, D, B>) -> Self {
        Self {
            keeper,
            last_height: None,
        }
    }

    pub fn keeper(&self) -> &OracleKeeper<S, K, D, B> {
        &self.keeper
    }

    pub fn last_height(&self) -> Option<u64> {
        self.last_height
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&OracleEvent) + Send + Sync>) {
        self.keeper.subscribe(listener);
    }

    pub fn init_genesis(&self, genesis: &GenesisState) -> Result<(), NodeError> {
        self.keeper.init_genesis(genesis)?;
        Ok(())
    }

    /// Load the genesis named by `config` (or the default one) and apply its
    /// parameter override.
    pub fn init_from_config(&self, config: &NodeConfig) -> Result<(), NodeError> {
        let mut genesis = match &config.genesis_path {
            Some(path) => GenesisState::from_json(&std::fs::read_to_string(path)?)?,
            None => GenesisState::default(),
        };
        if let Some(params) = &config.params {
            genesis.params = params.clone();
        }
        self.init_genesis(&genesis)?;
        tracing::info!(
            chain_id = %config.chain_id,
            vote_period = genesis.params.vote_period,
            whitelist = genesis.params.whitelist.len(),
            "oracle app initialized"
        );
        Ok(())
    }

    /// Deliver `msgs` at `height`, then run the end-block hook.
    pub fn apply_block(&mut self, height: u64, msgs: &[OracleMsg]) -> Result<BlockResult, NodeError> {
        if let Some(last) = self.last_height {
            if height <= last {
                return Err(NodeError::InvalidBlock(format!(
                    "height {height} does not follow {last}"
                )));
            }
        }

        let block_span = tracing_spans::block_span(height);
        let _entered = block_span.enter();

        let mut txs = Vec::with_capacity(msgs.len());
        for msg in msgs {
            let validator = msg.validator().to_string();
            let span = tracing_spans::msg_span(msg.kind(), &validator);
            let result = span.in_scope(|| self.keeper.handle_msg(height, msg));
            match result {
                Ok(()) => txs.push(TxResult {
                    kind: msg.kind(),
                    error: None,
                }),
                Err(e) if e.is_fatal() => {
                    tracing::error!(kind = msg.kind(), %validator, error = %e, "message aborted block");
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::debug!(kind = msg.kind(), %validator, error = %e, "message rejected");
                    txs.push(TxResult {
                        kind: msg.kind(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let params = self.keeper.params()?;
        let end_block = tracing_spans::end_block_span(height)
            .in_scope(|| self.keeper.end_block(height, &params))?;

        self.last_height = Some(height);
        Ok(BlockResult {
            height,
            txs,
            end_block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_crypto::{acc_address_from_key, key_hash, val_address_from_key, vote_hash};
    use oracle_transactions::{MsgAggregateExchangeRatePrevote, MsgAggregateExchangeRateVote};
    use oracle_types::{Denom, Dec, OracleParams, ValAddress};

    fn app_with_one_validator() -> (InMemoryApp, ValAddress) {
        let key = key_hash(b"validator-0");
        let val = val_address_from_key(&key);
        let staking = NullStaking::default();
        staking.add_validator(&val, 10_000_000);
        let app = InMemoryApp::in_memory(staking);
        let mut genesis = GenesisState::default();
        genesis.params = OracleParams {
            whitelist: vec![Denom::new("usdr", Dec::with_prec(25, 4))],
            ..OracleParams::default()
        };
        app.init_genesis(&genesis).unwrap();
        (app, val)
    }

    #[test]
    fn heights_must_increase() {
        let (mut app, _) = app_with_one_validator();
        app.apply_block(3, &[]).unwrap();
        assert_eq!(app.last_height(), Some(3));
        assert!(matches!(app.apply_block(3, &[]), Err(NodeError::InvalidBlock(_))));
        assert!(matches!(app.apply_block(2, &[]), Err(NodeError::InvalidBlock(_))));
        app.apply_block(4, &[]).unwrap();
    }

    #[test]
    fn rejected_message_does_not_abort_block() {
        let (mut app, val) = app_with_one_validator();
        let feeder = acc_address_from_key(&key_hash(b"validator-0"));
        let hash = vote_hash("abcd", "1.5usdr", &val);
        let msgs: Vec<OracleMsg> = vec![
            // reveal without a prevote
            MsgAggregateExchangeRateVote::new("abcd", "1.5usdr", feeder.clone(), val.clone()).into(),
            MsgAggregateExchangeRatePrevote::new(hash.to_string(), feeder, val).into(),
        ];
        let result = app.apply_block(1, &msgs).unwrap();
        assert_eq!(result.txs.len(), 2);
        assert!(!result.txs[0].is_ok());
        assert!(result.txs[1].is_ok());
        assert_eq!(result.accepted(), 1);
    }

    #[test]
    fn missing_params_is_fatal() {
        let mut app = InMemoryApp::in_memory(NullStaking::default());
        assert!(matches!(app.apply_block(1, &[]), Err(NodeError::Oracle(_))));
        assert_eq!(app.last_height(), None);
    }

    #[test]
    fn init_from_config_applies_params_override() {
        let app = InMemoryApp::in_memory(NullStaking::default());
        let params = OracleParams {
            vote_period: 1,
            ..OracleParams::default()
        };
        let config = NodeConfig {
            params: Some(params.clone()),
            ..NodeConfig::default()
        };
        app.init_from_config(&config).unwrap();
        assert_eq!(app.keeper().params().unwrap(), params);
    }

    #[test]
    fn init_from_config_reads_genesis_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        let mut genesis = GenesisState::default();
        genesis.params.vote_period = 7;
        std::fs::write(&path, genesis.to_json().unwrap()).unwrap();

        let app = InMemoryApp::in_memory(NullStaking::default());
        let config = NodeConfig {
            genesis_path: Some(path),
            ..NodeConfig::default()
        };
        app.init_from_config(&config).unwrap();
        assert_eq!(app.keeper().params().unwrap().vote_period, 7);
    }
}
