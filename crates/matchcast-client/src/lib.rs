//! Scorekeeper stream client and scene switcher service.
//!
//! The I/O half of Matchcast. A [`stream::StreamClient`] runs on its own
//! thread, reading the scorekeeper websocket and handing decoded updates to
//! the polling thread. The [`supervisor::Supervisor`] restarts it after a
//! failure, and the [`Switcher`] ties both to the pure selector in
//! `matchcast-core`.
//!
//! # Components
//!
//! - [`Switcher`]: service context owning presentation, settings, worker, queue
//! - [`Supervisor`]: worker lifecycle and bounded reconnects
//! - [`StreamClient`]: websocket receive loop with a cooperative stop signal
//! - [`WorkerHandle`]: a worker thread plus its stop signal
//! - [`Launcher`]: seam for starting workers, swapped out in tests

pub mod error;
pub mod stream;
pub mod supervisor;
pub mod switcher;
pub mod worker;

pub use error::{StreamError, SwitcherError};
pub use stream::{StreamClient, StreamConfig, StreamLauncher};
pub use supervisor::{Supervision, Supervisor};
pub use switcher::{PollReport, Switcher, SwitcherStatus};
pub use worker::{Launcher, StopSignal, WorkerContext, WorkerHandle};
