//! Host event loop.
//!
//! Drives [`Switcher::poll`] on a fixed tick and feeds operator commands from
//! stdin. Everything runs on the calling task, which stands in for the
//! presentation thread of a real broadcast application.

use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};

use matchcast_client::{Launcher, Switcher};
use matchcast_core::{ConfigSource, Hotkey, Presentation};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

use crate::{
    commands::{self, Command},
    error::AppError,
    stage::HeadlessStage,
};

/// Run until `quit` or Ctrl-C, then shut the switcher down.
pub async fn run<C, L>(switcher: &mut Switcher<HeadlessStage, C, L>, tick: Duration) -> Result<(), AppError>
where
    C: ConfigSource,
    L: Launcher,
{
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                info!("received ctrl-c, exiting");
                break;
            }
            _ = ticker.tick() => {
                let report = switcher.poll(Instant::now());
                if !report.outcomes.is_empty() {
                    debug!(supervision = ?report.supervision, outcomes = ?report.outcomes, "poll");
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let Some(command) = commands::parse(&line)
                            && apply(switcher, command).is_break()
                        {
                            break;
                        }
                    },
                    None => {
                        debug!("stdin closed, commands disabled");
                        stdin_open = false;
                    },
                }
            }
        }
    }

    switcher.shutdown();
    Ok(())
}

/// Execute one operator command.
pub fn apply<C, L>(switcher: &mut Switcher<HeadlessStage, C, L>, command: Command) -> ControlFlow<()>
where
    C: ConfigSource,
    L: Launcher,
{
    match command {
        Command::Enable => press(switcher, Hotkey::Enable),
        Command::Disable => press(switcher, Hotkey::Disable),
        Command::Scene { name } => {
            if switcher.presentation_mut().switch_to(&name) {
                info!(scene = %name, "manual cut");
            } else {
                warn!(scene = %name, available = ?switcher.presentation().scene_names(), "no such scene");
            }
        },
        Command::Status => {
            let status = switcher.status();
            info!(
                enabled = status.enabled,
                uri = %status.stream_uri,
                worker = status.worker_running,
                retries = status.reconnect.retry_count,
                giving_up = status.reconnect.giving_up,
                queued = status.queued,
                scene = status.active_scene.as_deref().unwrap_or("-"),
                "status"
            );
        },
        Command::Quit => return ControlFlow::Break(()),
        Command::Unknown { input } => {
            warn!(%input, "unknown command (enable, disable, scene <name>, status, quit)");
        },
        Command::InvalidArgs { command, error } => warn!(%command, "{error}"),
    }
    ControlFlow::Continue(())
}

fn press<C, L>(switcher: &mut Switcher<HeadlessStage, C, L>, hotkey: Hotkey)
where
    C: ConfigSource,
    L: Launcher,
{
    let result = switcher.hotkey(hotkey, true).and_then(|()| switcher.hotkey(hotkey, false));
    if let Err(err) = result {
        warn!(%err, hotkey = hotkey.label(), "hotkey failed");
    }
}

#[cfg(test)]
mod tests {
    use matchcast_client::StreamLauncher;
    use matchcast_core::{MemoryConfig, SwitcherConfig};

    use super::*;

    fn switcher() -> Switcher<HeadlessStage, MemoryConfig, StreamLauncher> {
        let config = SwitcherConfig { enabled: false, ..SwitcherConfig::default() };
        let stage = HeadlessStage::for_config(&config, &["Sponsors".to_string()]);
        Switcher::new(stage, MemoryConfig::new(config), StreamLauncher::default())
    }

    #[test]
    fn quit_breaks() {
        let mut switcher = switcher();
        assert!(apply(&mut switcher, Command::Quit).is_break());
    }

    #[test]
    fn scene_cut_changes_program() {
        let mut switcher = switcher();
        let flow = apply(&mut switcher, Command::Scene { name: "Sponsors".into() });
        assert!(flow.is_continue());
        assert_eq!(switcher.presentation().active_scene().as_deref(), Some("Sponsors"));

        apply(&mut switcher, Command::Scene { name: "Nope".into() });
        assert_eq!(switcher.presentation().active_scene().as_deref(), Some("Sponsors"));
    }

    #[test]
    fn disable_persists_in_settings() {
        let mut switcher = switcher();
        switcher.config_mut().update(|config| config.enabled = true);
        // Invalid endpoint keeps any worker from starting.
        switcher.config_mut().update(|config| config.stream_uri = "http://nowhere".into());

        apply(&mut switcher, Command::Disable);
        assert!(!switcher.config_mut().get().enabled);
        assert!(!switcher.is_worker_running());
    }

    #[test]
    fn status_and_unknown_continue() {
        let mut switcher = switcher();
        assert!(apply(&mut switcher, Command::Status).is_continue());
        assert!(apply(&mut switcher, Command::Unknown { input: "x".into() }).is_continue());
    }
}
