//! Headless host for Matchcast
//!
//! A thin shell around [`matchcast_client::Switcher`]: settings live in a JSON
//! file, scenes live in memory, and the operator talks to the switcher over
//! stdin. All switching logic lives in the library crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod stage;
pub mod store;

pub use commands::Command;
pub use error::AppError;
pub use stage::HeadlessStage;
pub use store::FileConfigStore;
