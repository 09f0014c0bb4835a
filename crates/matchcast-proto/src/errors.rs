//! Error types for wire decoding.

use thiserror::Error;

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Errors produced while decoding scorekeeper messages.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Frame is not a JSON object with a string `updateType` field
    #[error("malformed update: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `updateType` is outside the set of known match updates
    #[error("unrecognized update type {0:?}")]
    UnknownUpdateType(String),
}
