use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("oracle error: {0}")]
    Oracle(#[from] oracle_engine::OracleError),

    #[error("genesis error: {0}")]
    Genesis(#[from] oracle_engine::GenesisError),

    #[error("invalid block: {0}")]
    InvalidBlock(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
