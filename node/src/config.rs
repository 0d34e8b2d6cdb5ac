//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use oracle_types::OracleParams;
use oracle_utils::LogFormat;

use crate::NodeError;

/// Configuration for the oracle host.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Chain identifier, recorded in logs.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,

    /// Path of the JSON genesis file, if any.
    #[serde(default)]
    pub genesis_path: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,oracle_engine=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Oracle parameters overriding the genesis record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<OracleParams>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> String {
    "oracle-local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string. Parameter overrides are
    /// validated here so a bad file fails at startup.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        if let Some(params) = &config.params {
            params
                .validate()
                .map_err(|e| NodeError::Config(e.to_string()))?;
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), NodeError> {
        oracle_utils::init_tracing(self.log_format, &self.log_level)
            .map_err(|e| NodeError::Logging(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            genesis_path: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_types::Dec;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.chain_id, "oracle-local");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
        assert!(config.params.is_none());
    }

    #[test]
    fn params_override_parses() {
        let toml = r#"
            chain_id = "oracle-test"
            log_format = "json"

            [params]
            vote_period = 1
            vote_threshold = "0.5"
            reward_band = "0.02"
            reward_distribution_window = 100
            slash_fraction = "0.01"
            slash_window = 100
            min_valid_per_window = "0.9"

            [[params.whitelist]]
            name = "usdr"
            tobin_tax = "0.0025"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        let params = config.params.unwrap();
        assert_eq!(params.vote_period, 1);
        assert_eq!(params.min_valid_per_window, Dec::with_prec(9, 1));
        assert_eq!(params.whitelist[0].name, "usdr");
    }

    #[test]
    fn invalid_params_override_is_rejected() {
        let toml = r#"
            [params]
            vote_period = 0
            vote_threshold = "0.5"
            reward_band = "0.02"
            reward_distribution_window = 100
            whitelist = []
            slash_fraction = "0.01"
            slash_window = 100
            min_valid_per_window = "0.9"
        "#;
        assert!(matches!(
            NodeConfig::from_toml_str(toml),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/oracle.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oracle.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();
        let config = NodeConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
    }
}
