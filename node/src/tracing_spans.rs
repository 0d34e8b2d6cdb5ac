//! Pre-built [`tracing::Span`] constructors for block execution.
//!
//! Consistent span names and fields make it easy to filter and correlate
//! logs from one block across the engine.

use tracing::{info_span, Span};

/// Span covering the full execution of a single block.
pub fn block_span(height: u64) -> Span {
    info_span!("block", height)
}

/// Span covering the delivery of one message.
pub fn msg_span(kind: &str, validator: &str) -> Span {
    info_span!("msg", kind = %kind, validator = %validator)
}

/// Span covering the end-block hooks.
pub fn end_block_span(height: u64) -> Span {
    info_span!("end_block", height)
}
