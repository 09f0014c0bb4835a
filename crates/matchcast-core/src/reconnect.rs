//! Bounded reconnect policy.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐ enable ┌──────────┐ connected ┌───────────┐
//! │ Stopped │───────>│ Starting │──────────>│ Connected │
//! └─────────┘        └──────────┘           └───────────┘
//!      ↑               ↑      │                   │
//!      │  retry < max  │      │ failure           │ failure
//!      │               │      ↓                   ↓
//!      │ disable     ┌──────────────┐  retry = max  ┌──────────┐
//!      └─────────────│ Disconnected │──────────────>│ GivenUp  │
//!                    └──────────────┘               └──────────┘
//! ```
//!
//! The counter is shared by the worker (which resets it after a successful
//! connect) and the supervisor (which bumps it after each failure). The lock
//! is held only for the read-modify-write, never across a connect.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Number of restarts attempted before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Retry limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive failed connections that are retried
    pub max_retries: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES }
    }
}

/// Snapshot of the shared reconnect state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectState {
    /// Consecutive failures since the last successful connect
    pub retry_count: u32,
    /// Set once retries are exhausted; cleared only by [`ReconnectTracker::reset`]
    pub giving_up: bool,
}

/// What the supervisor should do after a worker died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Start a fresh worker
    Retry {
        /// 1-based attempt number
        attempt: u32,
    },
    /// Stop retrying until re-enabled
    GiveUp {
        /// Retries spent before giving up
        attempts: u32,
    },
}

/// Lock-protected retry counter shared between worker and supervisor.
#[derive(Debug, Clone, Default)]
pub struct ReconnectTracker {
    policy: ReconnectPolicy,
    state: Arc<Mutex<ReconnectState>>,
}

impl ReconnectTracker {
    /// Tracker with a custom policy.
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, state: Arc::default() }
    }

    /// Policy in effect.
    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    /// Record a successful connection. Called by the worker once per connect.
    pub fn record_connected(&self) {
        self.lock().retry_count = 0;
    }

    /// Record a dead worker and decide whether to restart it.
    pub fn record_failure(&self) -> ReconnectDecision {
        let mut state = self.lock();
        if state.retry_count < self.policy.max_retries {
            state.retry_count += 1;
            ReconnectDecision::Retry { attempt: state.retry_count }
        } else {
            state.giving_up = true;
            ReconnectDecision::GiveUp { attempts: state.retry_count }
        }
    }

    /// Clear the counter and the give-up flag. Called on explicit (re-)enable.
    pub fn reset(&self) {
        *self.lock() = ReconnectState::default();
    }

    /// Current state.
    pub fn snapshot(&self) -> ReconnectState {
        *self.lock()
    }

    // A panicking holder cannot leave the plain-data state half-written.
    fn lock(&self) -> MutexGuard<'_, ReconnectState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
