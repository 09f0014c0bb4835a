//! Worker lifecycle and bounded reconnects.
//!
//! [`Supervisor::check`] runs once per poll. A worker whose thread has exited
//! counts as a failed connection: it is restarted while the retry budget lasts
//! and abandoned afterwards, until the switcher is re-enabled.

use std::io;

use matchcast_core::{HandoffSender, ReconnectDecision, ReconnectTracker};
use matchcast_proto::MatchUpdate;
use tracing::{debug, error, info, warn};

use crate::worker::{Launcher, WorkerContext, WorkerHandle};

/// Result of one supervision check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Supervision {
    /// No worker (disabled, or given up)
    #[default]
    Idle,
    /// Worker alive
    Running,
    /// Worker died and a new one was started
    Restarted {
        /// 1-based retry number
        attempt: u32,
    },
    /// Worker died and the retry budget is spent
    GaveUp {
        /// Retries spent
        attempts: u32,
    },
    /// Worker died and its replacement could not be spawned; retried on the next check
    RestartFailed,
}

/// Owns at most one stream worker.
#[derive(Debug)]
pub struct Supervisor<L> {
    launcher: L,
    reconnect: ReconnectTracker,
    updates: HandoffSender<MatchUpdate>,
    worker: Option<WorkerHandle>,
    /// A replacement worker failed to spawn; the next check retries it
    restart_pending: bool,
}

impl<L: Launcher> Supervisor<L> {
    /// Supervisor feeding `updates`, sharing `reconnect` with its workers.
    pub fn new(launcher: L, updates: HandoffSender<MatchUpdate>, reconnect: ReconnectTracker) -> Self {
        Self { launcher, reconnect, updates, worker: None, restart_pending: false }
    }

    /// Retry counter shared with the workers.
    pub fn reconnect(&self) -> &ReconnectTracker {
        &self.reconnect
    }

    /// True while a worker is held, alive or not yet reaped.
    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// True while a worker thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    /// Stop any current worker, then start a new one for `uri`.
    ///
    /// The old worker is fully joined first, so two workers never overlap.
    pub fn start(&mut self, uri: &str) -> io::Result<()> {
        self.stop();
        self.launch(uri)
    }

    /// Stop and join the current worker. Returns false if there was none.
    pub fn stop(&mut self) -> bool {
        self.restart_pending = false;
        let Some(worker) = self.worker.take() else {
            return false;
        };
        if let Err(err) = worker.stop() {
            debug!(%err, "stream worker had already failed");
        }
        true
    }

    /// Reap a dead worker and restart it if the retry budget allows.
    ///
    /// A replacement that fails to spawn counts as another failure and is
    /// retried on the next check until the budget is spent.
    pub fn check(&mut self, uri: &str) -> Supervision {
        match self.worker.take() {
            None if !self.restart_pending => return Supervision::Idle,
            None => {},
            Some(worker) if !worker.is_finished() => {
                self.worker = Some(worker);
                return Supervision::Running;
            },
            Some(dead) => match dead.join() {
                Ok(()) => warn!("stream worker exited"),
                Err(err) => warn!(%err, "connection to scorekeeper stream failed"),
            },
        }
        self.restart_pending = false;

        match self.reconnect.record_failure() {
            ReconnectDecision::Retry { attempt } => {
                info!(attempt, max = self.reconnect.policy().max_retries, "retrying connection");
                match self.launch(uri) {
                    Ok(()) => Supervision::Restarted { attempt },
                    Err(err) => {
                        error!(%err, "failed to restart stream worker");
                        self.restart_pending = true;
                        Supervision::RestartFailed
                    },
                }
            },
            ReconnectDecision::GiveUp { attempts } => {
                error!(attempts, "giving up on scorekeeper stream until re-enabled");
                Supervision::GaveUp { attempts }
            },
        }
    }

    fn launch(&mut self, uri: &str) -> io::Result<()> {
        let context =
            WorkerContext { updates: self.updates.clone(), reconnect: self.reconnect.clone() };
        self.worker = Some(self.launcher.launch(uri, context)?);
        Ok(())
    }
}

impl<L> Drop for Supervisor<L> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take()
            && let Err(err) = worker.stop()
        {
            debug!(%err, "stream worker had already failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
        time::{Duration, Instant},
    };

    use matchcast_core::{ReconnectPolicy, handoff};

    use super::*;
    use crate::error::StreamError;

    /// Workers that fail immediately, optionally after reporting a connect.
    #[derive(Default)]
    struct FailingLauncher {
        launched: Arc<AtomicUsize>,
        uris: Arc<Mutex<Vec<String>>>,
        connect_first: bool,
    }

    impl Launcher for FailingLauncher {
        fn launch(&self, uri: &str, context: WorkerContext) -> io::Result<WorkerHandle> {
            self.launched.fetch_add(1, Ordering::SeqCst);
            self.uris.lock().unwrap().push(uri.to_string());
            let connect_first = self.connect_first;
            WorkerHandle::spawn("failing-worker", move |_| {
                if connect_first {
                    context.reconnect.record_connected();
                }
                Err(StreamError::Closed)
            })
        }
    }

    /// Workers that run until stopped.
    #[derive(Default)]
    struct IdleLauncher {
        live: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Launcher for IdleLauncher {
        fn launch(&self, _uri: &str, _context: WorkerContext) -> io::Result<WorkerHandle> {
            let now_live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now_live, Ordering::SeqCst);
            let live = Arc::clone(&self.live);
            WorkerHandle::spawn("idle-worker", move |stop| {
                while !stop.is_raised() {
                    thread::sleep(Duration::from_millis(1));
                }
                live.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    /// Like [`FailingLauncher`], but the `fail_spawn`th launch (1-based)
    /// cannot spawn its thread.
    struct SpawnFailLauncher {
        launched: Arc<AtomicUsize>,
        fail_spawn: usize,
    }

    impl Launcher for SpawnFailLauncher {
        fn launch(&self, _uri: &str, _context: WorkerContext) -> io::Result<WorkerHandle> {
            let n = self.launched.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_spawn {
                return Err(io::Error::other("thread limit reached"));
            }
            WorkerHandle::spawn("failing-worker", |_| Err(StreamError::Closed))
        }
    }

    fn supervisor<L: Launcher>(launcher: L, policy: ReconnectPolicy) -> Supervisor<L> {
        let (tx, _rx) = handoff(4);
        Supervisor::new(launcher, tx, ReconnectTracker::new(policy))
    }

    /// Check until the current worker has died and been handled.
    fn settle<L: Launcher>(supervisor: &mut Supervisor<L>, uri: &str) -> Supervision {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let outcome = supervisor.check(uri);
            if outcome != Supervision::Running || Instant::now() > deadline {
                return outcome;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn idle_without_worker() {
        let mut supervisor = supervisor(IdleLauncher::default(), ReconnectPolicy::default());
        assert_eq!(supervisor.check("ws://scorekeeper/"), Supervision::Idle);
        assert!(!supervisor.stop());
    }

    #[test]
    fn restarts_until_budget_spent() {
        let launcher = FailingLauncher::default();
        let launched = Arc::clone(&launcher.launched);
        let mut supervisor = supervisor(launcher, ReconnectPolicy::default());
        supervisor.start("ws://scorekeeper/").unwrap();

        for attempt in 1..=10 {
            assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::Restarted { attempt });
            assert!(!supervisor.reconnect().snapshot().giving_up);
        }
        assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::GaveUp { attempts: 10 });
        assert!(supervisor.reconnect().snapshot().giving_up);
        assert!(!supervisor.has_worker());

        // nothing left to supervise
        assert_eq!(supervisor.check("ws://scorekeeper/"), Supervision::Idle);
        assert_eq!(launched.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn failed_spawn_is_retried_until_budget_spent() {
        let launched = Arc::new(AtomicUsize::new(0));
        let launcher = SpawnFailLauncher { launched: Arc::clone(&launched), fail_spawn: 2 };
        let mut supervisor = supervisor(launcher, ReconnectPolicy::default());
        supervisor.start("ws://scorekeeper/").unwrap();

        assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::RestartFailed);
        assert_eq!(supervisor.reconnect().snapshot().retry_count, 1);
        assert!(!supervisor.has_worker());

        // the failed spawn is retried on the next check, not forgotten
        assert_eq!(supervisor.check("ws://scorekeeper/"), Supervision::Restarted { attempt: 2 });
        for attempt in 3..=10 {
            assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::Restarted { attempt });
        }
        assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::GaveUp { attempts: 10 });
        assert!(supervisor.reconnect().snapshot().giving_up);
        assert_eq!(supervisor.check("ws://scorekeeper/"), Supervision::Idle);
        assert_eq!(launched.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn stop_clears_pending_restart() {
        let launcher = SpawnFailLauncher { launched: Arc::default(), fail_spawn: 2 };
        let mut supervisor = supervisor(launcher, ReconnectPolicy::default());
        supervisor.start("ws://scorekeeper/").unwrap();
        assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::RestartFailed);

        assert!(!supervisor.stop());
        assert_eq!(supervisor.check("ws://scorekeeper/"), Supervision::Idle);
    }

    #[test]
    fn restart_uses_current_uri() {
        let launcher = FailingLauncher::default();
        let uris = Arc::clone(&launcher.uris);
        let mut supervisor = supervisor(launcher, ReconnectPolicy::default());
        supervisor.start("ws://old/").unwrap();

        settle(&mut supervisor, "ws://new/");

        assert_eq!(*uris.lock().unwrap(), vec!["ws://old/".to_string(), "ws://new/".to_string()]);
    }

    #[test]
    fn successful_connect_keeps_budget_full() {
        let launcher = FailingLauncher { connect_first: true, ..Default::default() };
        let mut supervisor = supervisor(launcher, ReconnectPolicy { max_retries: 2 });
        supervisor.start("ws://scorekeeper/").unwrap();

        // every worker connects before failing, so the counter never passes 1
        for _ in 0..5 {
            assert_eq!(settle(&mut supervisor, "ws://scorekeeper/"), Supervision::Restarted { attempt: 1 });
        }
    }

    #[test]
    fn start_replaces_worker_without_overlap() {
        let launcher = IdleLauncher::default();
        let live = Arc::clone(&launcher.live);
        let peak = Arc::clone(&launcher.peak);
        let mut supervisor = supervisor(launcher, ReconnectPolicy::default());

        supervisor.start("ws://scorekeeper/").unwrap();
        supervisor.start("ws://scorekeeper/").unwrap();
        supervisor.start("ws://scorekeeper/").unwrap();

        assert_eq!(live.load(Ordering::SeqCst), 1);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(supervisor.check("ws://scorekeeper/"), Supervision::Running);

        assert!(supervisor.stop());
        assert!(!supervisor.stop());
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }
}
