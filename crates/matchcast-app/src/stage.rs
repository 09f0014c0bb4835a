//! In-memory presentation layer.
//!
//! Stands in for a broadcast application: a fixed list of scenes, one of them
//! on program. Switches are logged so a dry run shows what the real host would
//! have done.

use matchcast_core::{Hotkey, Presentation, SceneRole, SwitcherConfig};
use tracing::info;

/// Scene list with an index handle.
#[derive(Debug, Clone, Default)]
pub struct HeadlessStage {
    scenes: Vec<String>,
    active: Option<usize>,
}

impl HeadlessStage {
    /// Stage with the given scenes, nothing on program.
    pub fn new(scenes: impl IntoIterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for scene in scenes {
            if !scene.is_empty() && !unique.contains(&scene) {
                unique.push(scene);
            }
        }
        Self { scenes: unique, active: None }
    }

    /// The six configured match scenes followed by `extra`.
    pub fn for_config(config: &SwitcherConfig, extra: &[String]) -> Self {
        let roles = SceneRole::ALL.iter().map(|role| config.scenes.name(*role).to_string());
        Self::new(roles.chain(extra.iter().cloned()))
    }

    /// Scene names in order.
    pub fn scene_names(&self) -> &[String] {
        &self.scenes
    }

    /// Manual cut by the operator. Returns false if no scene has that name.
    pub fn switch_to(&mut self, name: &str) -> bool {
        match self.scenes.iter().position(|scene| scene == name) {
            Some(index) => {
                self.active = Some(index);
                true
            },
            None => false,
        }
    }
}

impl Presentation for HeadlessStage {
    type Scene = usize;

    fn scenes(&self) -> Vec<(String, usize)> {
        self.scenes.iter().cloned().enumerate().map(|(index, name)| (name, index)).collect()
    }

    fn active_scene(&self) -> Option<String> {
        self.active.and_then(|index| self.scenes.get(index)).cloned()
    }

    fn set_active_scene(&mut self, scene: usize) {
        if let Some(name) = self.scenes.get(scene) {
            info!(scene = %name, "program scene changed");
            self.active = Some(scene);
        }
    }

    fn register_hotkey(&mut self, hotkey: Hotkey) {
        info!(id = hotkey.id(), label = hotkey.label(), "hotkey registered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_config_lists_roles_then_extras() {
        let stage = HeadlessStage::for_config(
            &SwitcherConfig::default(),
            &["Sponsors".to_string(), "Match Load".to_string()],
        );
        assert_eq!(stage.scene_names().len(), 7);
        assert_eq!(stage.scene_names()[0], "Match Load");
        assert_eq!(stage.scene_names()[6], "Sponsors");
        assert_eq!(stage.active_scene(), None);
    }

    #[test]
    fn manual_switch() {
        let mut stage = HeadlessStage::new(["A".to_string(), "B".to_string()]);
        assert!(stage.switch_to("B"));
        assert_eq!(stage.active_scene().as_deref(), Some("B"));
        assert!(!stage.switch_to("C"));
        assert_eq!(stage.active_scene().as_deref(), Some("B"));
    }

    #[test]
    fn set_active_ignores_stale_handle() {
        let mut stage = HeadlessStage::new(["A".to_string()]);
        stage.set_active_scene(5);
        assert_eq!(stage.active_scene(), None);
        stage.set_active_scene(0);
        assert_eq!(stage.active_scene().as_deref(), Some("A"));
    }
}
