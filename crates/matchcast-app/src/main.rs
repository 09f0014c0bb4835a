//! `matchcast` binary: headless scene switcher.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use matchcast_app::{FileConfigStore, HeadlessStage, logging, runtime};
use matchcast_client::{StreamLauncher, Switcher};
use tracing::{error, info, warn};

/// Switch scenes from scorekeeper match updates.
#[derive(Debug, Parser)]
#[command(name = "matchcast", version, about)]
struct Args {
    /// Settings file
    #[arg(long, default_value = "matchcast.json")]
    config: PathBuf,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Extra scene available for manual cuts (repeatable)
    #[arg(long = "scene", value_name = "NAME")]
    scenes: Vec<String>,

    /// Scene on program at startup
    #[arg(long)]
    initial_scene: Option<String>,

    /// Write default settings to the config path and exit
    #[arg(long)]
    write_default: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "matchcast failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<(), matchcast_app::AppError> {
    if args.write_default {
        FileConfigStore::write_default(&args.config)?;
        info!(path = %args.config.display(), "wrote default settings");
        return Ok(());
    }

    let store = FileConfigStore::open(&args.config)?;
    let mut stage = HeadlessStage::for_config(store.config(), &args.scenes);
    if let Some(scene) = &args.initial_scene
        && !stage.switch_to(scene)
    {
        warn!(%scene, "initial scene not found");
    }

    let mut switcher = Switcher::new(stage, store, StreamLauncher::default());
    runtime::run(&mut switcher, Duration::from_millis(args.tick_ms)).await
}
