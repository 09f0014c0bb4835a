//! Operator commands read from stdin.
//!
//! The headless host has no hotkey system, so the enable/disable hotkeys and
//! manual scene cuts are typed instead. A leading `/` is accepted and ignored.

/// Parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Release of the enable hotkey.
    Enable,

    /// Release of the disable hotkey.
    Disable,

    /// Manual cut to a scene, as an operator would do in the host.
    Scene {
        /// Scene name, may contain spaces.
        name: String,
    },

    /// Log the switcher status.
    Status,

    /// Stop the host.
    Quit,

    /// Unknown command.
    Unknown {
        /// The original input.
        input: String,
    },

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

/// Parse one line of operator input. Blank lines yield `None`.
pub fn parse(input: &str) -> Option<Command> {
    let input = input.trim();
    let line = input.strip_prefix('/').unwrap_or(input);
    if line.is_empty() {
        return None;
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "enable" | "on" => Command::Enable,
        "disable" | "off" => Command::Disable,
        "scene" | "cut" => {
            if rest.is_empty() {
                Command::InvalidArgs { command: "scene".into(), error: "Usage: scene <name>".into() }
            } else {
                Command::Scene { name: rest.to_string() }
            }
        },
        "status" => Command::Status,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown { input: input.to_string() },
    };
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hotkeys() {
        assert_eq!(parse("enable"), Some(Command::Enable));
        assert_eq!(parse("/disable"), Some(Command::Disable));
        assert_eq!(parse("  OFF "), Some(Command::Disable));
    }

    #[test]
    fn parse_scene_keeps_spaces() {
        assert_eq!(parse("scene Match Post"), Some(Command::Scene { name: "Match Post".into() }));
        assert_eq!(parse("cut   Field Cam  "), Some(Command::Scene { name: "Field Cam".into() }));
    }

    #[test]
    fn parse_scene_missing_name() {
        assert!(matches!(parse("scene"), Some(Command::InvalidArgs { command, .. }) if command == "scene"));
    }

    #[test]
    fn parse_status_and_quit() {
        assert_eq!(parse("status"), Some(Command::Status));
        assert_eq!(parse("q"), Some(Command::Quit));
        assert_eq!(parse("/quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(parse("reboot now"), Some(Command::Unknown { input: "reboot now".into() }));
    }

    #[test]
    fn parse_blank() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("/"), None);
    }
}
