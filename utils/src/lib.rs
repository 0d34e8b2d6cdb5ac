//! Shared utilities for the oracle workspace.

pub mod logging;

pub use logging::{init_tracing, LogFormat, LogFormatError};
