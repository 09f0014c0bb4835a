//! Scene selector and post-match timer.
//!
//! # Cycle
//!
//! [`SceneSelector::run_cycle`] runs once per poll and loops until there is
//! no work left:
//!
//! 1. If the post scene is on program and its wait has elapsed, target
//!    [`SceneRole::MatchWait`].
//! 2. Otherwise dequeue one update and map it to a role; stop when the queue
//!    is empty.
//! 3. Unless overriding, skip the target when the operator is on a scene that
//!    belongs to none of the six roles.
//! 4. Activate the scene configured for the target role, if it exists.
//! 5. Entering [`SceneRole::MatchPost`] records the time for step 1.
//!
//! The post timer is keyed to the last switch into the post scene, not to how
//! long the post scene has stayed on program. An operator who cuts away and
//! back does not restart it.

use std::time::Instant;

use matchcast_proto::{MatchUpdate, UpdateType};
use tracing::{debug, info, warn};

use crate::{
    config::SwitcherConfig, presentation::Presentation, queue::HandoffReceiver, role::SceneRole,
};

/// Why the selector targeted a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A scorekeeper update
    Update(UpdateType),
    /// The post-match wait elapsed
    PostTimeout,
}

/// Result of one selector iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOutcome {
    /// Scene for `role` was put on program
    Activated {
        /// Target role
        role: SceneRole,
        /// What caused the switch
        trigger: Trigger,
    },
    /// Operator is on a non-match scene; nothing switched
    Guarded {
        /// Target role that was skipped
        role: SceneRole,
        /// What caused the attempt
        trigger: Trigger,
    },
    /// No scene carries the configured name
    SceneMissing {
        /// Target role
        role: SceneRole,
        /// Configured scene name that matched nothing
        scene: String,
    },
    /// Update type outside the known set; dropped
    Unrecognized {
        /// Raw `updateType`
        update_type: String,
    },
}

/// Poll-driven scene selector.
///
/// Owned by the polling thread. Time is passed in by the caller so the timer
/// can be exercised without sleeping.
#[derive(Debug, Clone, Default)]
pub struct SceneSelector {
    /// Last switch into the post scene
    post_entered_at: Option<Instant>,
}

impl SceneSelector {
    /// Selector with no pending post timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// When the post scene was last entered, if the timer is armed.
    pub fn post_entered_at(&self) -> Option<Instant> {
        self.post_entered_at
    }

    /// Disarm the post timer.
    pub fn clear(&mut self) {
        self.post_entered_at = None;
    }

    /// Drain `updates` and apply them to `presentation`.
    ///
    /// `now` is used both for the timeout check and as the entry time of a
    /// post switch made during this cycle.
    pub fn run_cycle<P: Presentation>(
        &mut self,
        config: &SwitcherConfig,
        presentation: &mut P,
        updates: &HandoffReceiver<MatchUpdate>,
        now: Instant,
    ) -> Vec<SelectorOutcome> {
        let mut outcomes = Vec::new();

        loop {
            let active = presentation.active_scene();

            let (role, trigger) = if self.post_wait_elapsed(config, active.as_deref(), now) {
                self.post_entered_at = None;
                (SceneRole::MatchWait, Trigger::PostTimeout)
            } else {
                let Some(update) = updates.try_dequeue() else {
                    break;
                };
                match update.kind() {
                    Ok(kind) => {
                        // a newer update supersedes any pending post timer
                        self.post_entered_at = None;
                        (SceneRole::for_update(kind), Trigger::Update(kind))
                    },
                    Err(err) => {
                        warn!(update_type = %update.update_type, %err, "dropping scorekeeper update");
                        outcomes.push(SelectorOutcome::Unrecognized {
                            update_type: update.update_type,
                        });
                        continue;
                    },
                }
            };

            let on_match_scene = active.as_deref().is_some_and(|name| config.scenes.contains(name));
            if !config.override_non_match_scenes && !on_match_scene {
                debug!(%role, active = ?active, "operator is on a non-match scene; not switching");
                outcomes.push(SelectorOutcome::Guarded { role, trigger });
                continue;
            }

            outcomes.push(activate(config, presentation, role, trigger));

            if role == SceneRole::MatchPost {
                self.post_entered_at = Some(now);
            }
        }

        outcomes
    }

    fn post_wait_elapsed(&self, config: &SwitcherConfig, active: Option<&str>, now: Instant) -> bool {
        let on_post = active == Some(config.scenes.name(SceneRole::MatchPost));
        match (on_post, config.post_wait(), self.post_entered_at) {
            (true, Some(wait), Some(entered)) => now.saturating_duration_since(entered) >= wait,
            _ => false,
        }
    }
}

fn activate<P: Presentation>(
    config: &SwitcherConfig,
    presentation: &mut P,
    role: SceneRole,
    trigger: Trigger,
) -> SelectorOutcome {
    let name = config.scenes.name(role);
    let scene = presentation
        .scenes()
        .into_iter()
        .find_map(|(scene_name, scene)| (scene_name == name).then_some(scene));

    match scene {
        Some(scene) => {
            presentation.set_active_scene(scene);
            info!(%role, scene = name, ?trigger, "switched scene");
            SelectorOutcome::Activated { role, trigger }
        },
        None => {
            debug!(%role, scene = name, "configured scene does not exist");
            SelectorOutcome::SceneMissing { role, scene: name.to_string() }
        },
    }
}
