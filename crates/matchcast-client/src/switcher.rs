//! The switcher service context.
//!
//! [`Switcher`] owns everything the host would otherwise keep in globals: the
//! presentation handle, the settings source, the worker supervisor, the
//! consumer end of the update queue and the selector. The host creates one,
//! calls [`Switcher::poll`] on a fixed tick from the thread that owns the
//! presentation layer, and calls [`Switcher::shutdown`] once on teardown.

use std::time::Instant;

use matchcast_core::{
    ConfigSource, HandoffReceiver, Hotkey, Presentation, ReconnectState, ReconnectTracker,
    SceneSelector, SelectorOutcome, handoff, queue::DEFAULT_CAPACITY,
};
use matchcast_proto::MatchUpdate;
use tracing::{info, warn};

use crate::{
    error::SwitcherError,
    stream::StreamLauncher,
    supervisor::{Supervision, Supervisor},
    worker::Launcher,
};

/// What one poll did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Worker supervision result; `Idle` while disabled
    pub supervision: Supervision,
    /// Selector outcomes, in processing order
    pub outcomes: Vec<SelectorOutcome>,
}

/// Point-in-time view for operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherStatus {
    /// Master switch from the settings
    pub enabled: bool,
    /// Configured stream endpoint
    pub stream_uri: String,
    /// A worker thread is alive
    pub worker_running: bool,
    /// Shared retry counter
    pub reconnect: ReconnectState,
    /// Updates waiting for the next poll
    pub queued: usize,
    /// Scene currently on program
    pub active_scene: Option<String>,
}

/// Automatic scene switcher.
#[derive(Debug)]
pub struct Switcher<P, C, L = StreamLauncher> {
    presentation: P,
    config: C,
    supervisor: Supervisor<L>,
    updates: HandoffReceiver<MatchUpdate>,
    selector: SceneSelector,
    /// Settings revision the worker was last started for
    applied_revision: Option<u64>,
}

impl<P, C, L> Switcher<P, C, L>
where
    P: Presentation,
    C: ConfigSource,
    L: Launcher,
{
    /// Build the service and register its hotkeys. No worker starts until the
    /// first poll or an explicit [`Switcher::apply_settings`].
    pub fn new(mut presentation: P, config: C, launcher: L) -> Self {
        for hotkey in Hotkey::ALL {
            presentation.register_hotkey(hotkey);
        }

        let (tx, rx) = handoff(DEFAULT_CAPACITY);
        Self {
            presentation,
            config,
            supervisor: Supervisor::new(launcher, tx, ReconnectTracker::default()),
            updates: rx,
            selector: SceneSelector::new(),
            applied_revision: None,
        }
    }

    /// Restart the worker to match the current settings.
    ///
    /// Any running worker is stopped and joined first. When enabled, the
    /// retry counter is reset and a fresh worker connects to the configured
    /// URI. Calling this repeatedly is harmless.
    pub fn apply_settings(&mut self) -> Result<(), SwitcherError> {
        let (revision, config) = self.config.load();
        self.applied_revision = Some(revision);

        if self.supervisor.stop() {
            info!("disconnected from scorekeeper stream");
        }
        if !config.enabled {
            return Ok(());
        }

        config.validate()?;
        self.supervisor.reconnect().reset();
        info!(uri = %config.stream_uri, "connecting to scorekeeper stream");
        self.supervisor.start(&config.stream_uri)?;
        Ok(())
    }

    /// Turn switching on and connect.
    pub fn enable(&mut self) -> Result<(), SwitcherError> {
        self.config.set_enabled(true);
        self.apply_settings()
    }

    /// Turn switching off and stop the worker.
    pub fn disable(&mut self) -> Result<(), SwitcherError> {
        self.config.set_enabled(false);
        self.apply_settings()
    }

    /// Dispatch a hotkey. Hotkeys act on release.
    pub fn hotkey(&mut self, hotkey: Hotkey, pressed: bool) -> Result<(), SwitcherError> {
        if pressed {
            return Ok(());
        }
        match hotkey {
            Hotkey::Enable => self.enable(),
            Hotkey::Disable => self.disable(),
        }
    }

    /// One poll cycle.
    ///
    /// Re-applies settings if they changed, then (while enabled) reaps or
    /// restarts a dead worker and drains the update queue. Queued updates are
    /// still applied in the cycle that notices a dead worker.
    pub fn poll(&mut self, now: Instant) -> PollReport {
        let (revision, config) = self.config.load();
        if self.applied_revision != Some(revision)
            && let Err(err) = self.apply_settings()
        {
            warn!(%err, "failed to apply settings");
        }

        if !config.enabled {
            return PollReport::default();
        }

        let supervision = self.supervisor.check(&config.stream_uri);
        let outcomes = self.selector.run_cycle(&config, &mut self.presentation, &self.updates, now);
        PollReport { supervision, outcomes }
    }

    /// Stop the worker. The host stops calling [`Switcher::poll`] afterwards.
    pub fn shutdown(&mut self) {
        if self.supervisor.stop() {
            info!("stream worker stopped");
        }
        self.selector.clear();
    }

    /// Snapshot for status displays.
    pub fn status(&mut self) -> SwitcherStatus {
        let (_, config) = self.config.load();
        SwitcherStatus {
            enabled: config.enabled,
            stream_uri: config.stream_uri,
            worker_running: self.supervisor.is_running(),
            reconnect: self.supervisor.reconnect().snapshot(),
            queued: self.updates.len(),
            active_scene: self.presentation.active_scene(),
        }
    }

    /// True while a worker thread is alive.
    pub fn is_worker_running(&self) -> bool {
        self.supervisor.is_running()
    }

    /// Shared retry counter.
    pub fn reconnect_state(&self) -> ReconnectState {
        self.supervisor.reconnect().snapshot()
    }

    /// Post timer and selector state.
    pub fn selector(&self) -> &SceneSelector {
        &self.selector
    }

    /// Presentation handle.
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// Mutable presentation handle, for operator actions made through the host.
    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Settings source, for hosts that edit settings in place.
    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }
}
