//! Settings persisted as a JSON file.
//!
//! The file is re-read whenever its modification time changes, so edits made
//! while the host runs take effect on the next poll. The revision only moves
//! when the parsed settings actually differ.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use matchcast_core::{ConfigSource, SwitcherConfig};
use tracing::{debug, info, warn};

use crate::error::AppError;

/// [`ConfigSource`] backed by a JSON file.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    config: SwitcherConfig,
    revision: u64,
    modified: Option<SystemTime>,
}

impl FileConfigStore {
    /// Load settings from `path`. A missing file yields defaults; a file that
    /// does not parse is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let (config, modified) = match fs::metadata(&path) {
            Ok(metadata) => (read_settings(&path)?, metadata.modified().ok()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "settings file not found, using defaults");
                (SwitcherConfig::default(), None)
            },
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, config, revision: 0, modified })
    }

    /// Write default settings to `path`, replacing any existing file.
    pub fn write_default(path: impl AsRef<Path>) -> Result<(), AppError> {
        write_settings(path.as_ref(), &SwitcherConfig::default())
    }

    /// Settings file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings as last loaded.
    pub fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    /// Re-read the file if it changed on disk. Returns true when the settings
    /// changed. Unparseable content is logged and the previous settings kept.
    pub fn refresh(&mut self) -> bool {
        let Ok(modified) = fs::metadata(&self.path).and_then(|metadata| metadata.modified()) else {
            return false;
        };
        if self.modified == Some(modified) {
            return false;
        }
        self.modified = Some(modified);

        match read_settings(&self.path) {
            Ok(config) if config != self.config => {
                debug!(path = %self.path.display(), "settings reloaded");
                self.config = config;
                self.revision += 1;
                true
            },
            Ok(_) => false,
            Err(err) => {
                warn!(error = %err, "keeping previous settings");
                false
            },
        }
    }

    /// Persist the current settings.
    pub fn save(&mut self) -> Result<(), AppError> {
        write_settings(&self.path, &self.config)?;
        self.modified = fs::metadata(&self.path).and_then(|metadata| metadata.modified()).ok();
        Ok(())
    }
}

impl ConfigSource for FileConfigStore {
    fn load(&mut self) -> (u64, SwitcherConfig) {
        self.refresh();
        (self.revision, self.config.clone())
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled == enabled {
            return;
        }
        self.config.enabled = enabled;
        self.revision += 1;
        if let Err(err) = self.save() {
            warn!(error = %err, "failed to persist enabled flag");
        }
    }
}

fn read_settings(path: &Path) -> Result<SwitcherConfig, AppError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| AppError::Settings { path: path.to_path_buf(), source })
}

fn write_settings(path: &Path, config: &SwitcherConfig) -> Result<(), AppError> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
