//! Host presentation API.
//!
//! Every call happens on the polling thread. Hosts whose scene API is not
//! thread-safe can rely on that.

/// Scene enumeration and activation provided by the host.
pub trait Presentation {
    /// Host handle for a scene.
    type Scene;

    /// All scenes, with their display names.
    fn scenes(&self) -> Vec<(String, Self::Scene)>;

    /// Name of the scene currently on program, if any.
    fn active_scene(&self) -> Option<String>;

    /// Put `scene` on program.
    fn set_active_scene(&mut self, scene: Self::Scene);

    /// Make a switcher hotkey available to the operator.
    ///
    /// The host dispatches presses back through the switcher's `hotkey`
    /// method. Hosts without hotkey support keep the default.
    fn register_hotkey(&mut self, hotkey: Hotkey) {
        let _ = hotkey;
    }
}

/// Operator hotkeys exposed by the switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotkey {
    /// Turn automatic switching on
    Enable,
    /// Turn automatic switching off
    Disable,
}

impl Hotkey {
    /// Both hotkeys.
    pub const ALL: [Self; 2] = [Self::Enable, Self::Disable];

    /// Stable identifier, suitable for persisting bindings.
    pub fn id(self) -> &'static str {
        match self {
            Self::Enable => "matchcast.enable",
            Self::Disable => "matchcast.disable",
        }
    }

    /// Label shown in the host's hotkey settings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Enable => "Enable automatic scene switcher",
            Self::Disable => "Disable automatic scene switcher",
        }
    }
}
