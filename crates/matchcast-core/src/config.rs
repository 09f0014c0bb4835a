//! Switcher settings.
//!
//! Settings are owned by the host and read again on every poll, so edits take
//! effect without a restart. Nothing in the core caches a scene name.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, role::SceneRole};

/// Default scorekeeper stream endpoint.
pub const DEFAULT_STREAM_URI: &str = "ws://localhost/api/v2/stream/";

/// Default delay before leaving the post-match scene.
pub const DEFAULT_MATCH_WAIT_SECONDS: i64 = 30;

/// Longest accepted post-match delay.
pub const MAX_MATCH_WAIT_SECONDS: i64 = 600;

/// Scene name configured for each role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNames {
    /// Scene shown when a match is loaded
    pub match_load: String,
    /// Scene shown while a match runs
    pub match_start: String,
    /// Scene shown after an abort
    pub match_abort: String,
    /// Scene shown after scores are committed
    pub match_commit: String,
    /// Scene shown when results are posted
    pub match_post: String,
    /// Scene shown between matches
    pub match_wait: String,
}

impl SceneNames {
    /// Scene name configured for `role`.
    pub fn name(&self, role: SceneRole) -> &str {
        match role {
            SceneRole::MatchLoad => &self.match_load,
            SceneRole::MatchStart => &self.match_start,
            SceneRole::MatchAbort => &self.match_abort,
            SceneRole::MatchCommit => &self.match_commit,
            SceneRole::MatchPost => &self.match_post,
            SceneRole::MatchWait => &self.match_wait,
        }
    }

    /// Mutable access to the name configured for `role`.
    pub fn name_mut(&mut self, role: SceneRole) -> &mut String {
        match role {
            SceneRole::MatchLoad => &mut self.match_load,
            SceneRole::MatchStart => &mut self.match_start,
            SceneRole::MatchAbort => &mut self.match_abort,
            SceneRole::MatchCommit => &mut self.match_commit,
            SceneRole::MatchPost => &mut self.match_post,
            SceneRole::MatchWait => &mut self.match_wait,
        }
    }

    /// True if `scene` is configured for any of the six roles.
    pub fn contains(&self, scene: &str) -> bool {
        SceneRole::ALL.into_iter().any(|role| self.name(role) == scene)
    }
}

impl Default for SceneNames {
    fn default() -> Self {
        Self {
            match_load: SceneRole::MatchLoad.label().to_string(),
            match_start: SceneRole::MatchStart.label().to_string(),
            match_abort: SceneRole::MatchAbort.label().to_string(),
            match_commit: SceneRole::MatchCommit.label().to_string(),
            match_post: SceneRole::MatchPost.label().to_string(),
            match_wait: SceneRole::MatchWait.label().to_string(),
        }
    }
}

/// Settings for the automatic scene switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Master switch; while false no worker runs and nothing is switched
    pub enabled: bool,
    /// Switch even when the operator is on a scene outside the six roles
    pub override_non_match_scenes: bool,
    /// Scorekeeper websocket endpoint
    pub stream_uri: String,
    /// Seconds on the post scene before moving to the wait scene; -1 disables
    pub match_wait_seconds: i64,
    /// Scene name per role
    pub scenes: SceneNames,
}

impl SwitcherConfig {
    /// Delay before the post-match auto-advance, or `None` when disabled.
    pub fn post_wait(&self) -> Option<Duration> {
        u64::try_from(self.match_wait_seconds).ok().map(Duration::from_secs)
    }

    /// Check ranges and the stream URI scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-1..=MAX_MATCH_WAIT_SECONDS).contains(&self.match_wait_seconds) {
            return Err(ConfigError::WaitOutOfRange {
                seconds: self.match_wait_seconds,
                max: MAX_MATCH_WAIT_SECONDS,
            });
        }

        let uri = self.stream_uri.trim();
        let has_host = uri
            .strip_prefix("ws://")
            .or_else(|| uri.strip_prefix("wss://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(ConfigError::InvalidUri(self.stream_uri.clone()));
        }

        Ok(())
    }
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            override_non_match_scenes: false,
            stream_uri: DEFAULT_STREAM_URI.to_string(),
            match_wait_seconds: DEFAULT_MATCH_WAIT_SECONDS,
            scenes: SceneNames::default(),
        }
    }
}

/// Host-owned settings storage.
///
/// The switcher calls [`ConfigSource::load`] on every poll. The revision must
/// change whenever the settings do; a new revision is what makes the switcher
/// reconnect with the new stream URI or stop the worker after a disable.
pub trait ConfigSource {
    /// Current revision and settings.
    fn load(&mut self) -> (u64, SwitcherConfig);

    /// Persist the master switch. Called by the enable/disable hotkeys.
    fn set_enabled(&mut self, enabled: bool);
}

/// In-process settings, for embedding hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    config: SwitcherConfig,
    revision: u64,
}

impl MemoryConfig {
    /// Wrap initial settings.
    pub fn new(config: SwitcherConfig) -> Self {
        Self { config, revision: 0 }
    }

    /// Current settings.
    pub fn get(&self) -> &SwitcherConfig {
        &self.config
    }

    /// Edit the settings in place and bump the revision.
    pub fn update(&mut self, edit: impl FnOnce(&mut SwitcherConfig)) {
        edit(&mut self.config);
        self.revision += 1;
    }
}

impl ConfigSource for MemoryConfig {
    fn load(&mut self) -> (u64, SwitcherConfig) {
        (self.revision, self.config.clone())
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.update(|config| config.enabled = enabled);
    }
}
