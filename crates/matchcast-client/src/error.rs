//! Error types for the stream worker and the switcher.

use std::io;

use matchcast_core::ConfigError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Why a stream worker ended other than by a stop request.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Connect or read failed
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// Scorekeeper closed the connection
    #[error("scorekeeper closed the stream")]
    Closed,

    /// Worker could not build its runtime
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[source] io::Error),

    /// Worker thread panicked
    #[error("stream worker panicked")]
    Panicked,
}

/// Errors surfaced by [`crate::Switcher`] when applying settings.
#[derive(Debug, Error)]
pub enum SwitcherError {
    /// Settings are unusable; no worker was started
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),

    /// Worker thread could not be spawned
    #[error("failed to spawn stream worker: {0}")]
    Spawn(#[from] io::Error),
}
