//! Host error type.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors at the edge of the host: files, stdin, JSON.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing a file or stdin failed
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Settings file is not valid JSON for the settings schema
    #[error("settings file {path}: {source}")]
    Settings {
        /// File that failed to parse
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// Settings could not be serialized
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}
