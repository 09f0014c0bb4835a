//! Error types for settings validation and the handoff queue.

use thiserror::Error;

/// Invalid settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Post-match wait outside the accepted range
    #[error("match wait of {seconds}s is outside -1..={max}")]
    WaitOutOfRange {
        /// Configured value
        seconds: i64,
        /// Largest accepted value
        max: i64,
    },

    /// Stream URI is empty or not a websocket URI
    #[error("stream uri {0:?} is not a ws:// or wss:// uri")]
    InvalidUri(String),
}

/// Reasons a non-blocking enqueue was refused.
///
/// The refused item is dropped either way; the queue never blocks the
/// producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    /// Queue is at capacity
    #[error("handoff queue is full")]
    Full,

    /// Consumer side was dropped
    #[error("handoff queue is closed")]
    Closed,
}
