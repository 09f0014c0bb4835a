//! Matchcast core logic
//!
//! Scene selection and connection supervision for a scorekeeper-driven
//! broadcast, kept free of network I/O so the same code runs in the host and in
//! deterministic tests.
//!
//! # Architecture
//!
//! The network worker and the presentation host never share state directly.
//! Decoded updates cross from the worker thread to the polling thread through
//! the bounded [`queue`], and the only other shared value is the retry counter
//! in [`reconnect`]. Everything that touches the presentation layer runs on the
//! polling thread inside [`selector::SceneSelector::run_cycle`], with the
//! current time passed in by the caller.
//!
//! # Components
//!
//! - [`role`]: the six logical scene roles and the update → role table
//! - [`config`]: settings read fresh on every poll, plus [`config::ConfigSource`]
//! - [`queue`]: bounded drop-newest handoff between worker and poller
//! - [`reconnect`]: lock-protected retry counter with the give-up policy
//! - [`presentation`]: trait for the host's scene API
//! - [`selector`]: the poll-driven scene selector and post-match timer
//! - [`error`]: configuration and queue error types

pub mod config;
pub mod error;
pub mod presentation;
pub mod queue;
pub mod reconnect;
pub mod role;
pub mod selector;

pub use config::{ConfigSource, MemoryConfig, SceneNames, SwitcherConfig};
pub use error::{ConfigError, EnqueueError};
pub use presentation::{Hotkey, Presentation};
pub use queue::{HandoffReceiver, HandoffSender, handoff};
pub use reconnect::{ReconnectDecision, ReconnectPolicy, ReconnectState, ReconnectTracker};
pub use role::SceneRole;
pub use selector::{SceneSelector, SelectorOutcome, Trigger};
