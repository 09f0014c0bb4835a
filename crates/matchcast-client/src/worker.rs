//! Worker threads and their stop signal.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use matchcast_core::{HandoffSender, ReconnectTracker};
use matchcast_proto::MatchUpdate;

use crate::error::StreamError;

/// Cooperative cancellation flag, checked by the worker at each receive
/// timeout.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Fresh, unraised signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the worker to stop.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once [`StopSignal::raise`] was called.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Shared state handed to every worker.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    /// Producer side of the update queue
    pub updates: HandoffSender<MatchUpdate>,
    /// Retry counter, reset by the worker after connecting
    pub reconnect: ReconnectTracker,
}

/// Starts stream workers.
///
/// Production uses [`crate::StreamLauncher`]; tests plug in scripted workers
/// to drive the supervisor without a network.
pub trait Launcher {
    /// Start a worker for `uri`.
    fn launch(&self, uri: &str, context: WorkerContext) -> io::Result<WorkerHandle>;
}

/// A running worker thread.
///
/// The thread's result is its exit status: `Ok` after a stop request, an error
/// when the connection failed.
#[derive(Debug)]
pub struct WorkerHandle {
    thread: JoinHandle<Result<(), StreamError>>,
    stop: StopSignal,
}

impl WorkerHandle {
    /// Spawn `task` on a named thread, handing it the stop signal.
    pub fn spawn<F>(name: &str, task: F) -> io::Result<Self>
    where
        F: FnOnce(StopSignal) -> Result<(), StreamError> + Send + 'static,
    {
        let stop = StopSignal::new();
        let signal = stop.clone();
        let thread = thread::Builder::new().name(name.to_string()).spawn(move || task(signal))?;
        Ok(Self { thread, stop })
    }

    /// True once the thread has exited. Never blocks.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Raise the stop signal and wait for the thread.
    ///
    /// Blocks for at most one receive timeout once the worker is in its
    /// receive loop.
    pub fn stop(self) -> Result<(), StreamError> {
        self.stop.raise();
        self.join()
    }

    /// Wait for the thread and return its exit status.
    pub fn join(self) -> Result<(), StreamError> {
        self.thread.join().unwrap_or_else(|_| Err(StreamError::Panicked))
    }
}
