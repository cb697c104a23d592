//! JSON-file persistence for `UserSettings`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::{EngineError, UserSettings};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable
    ///
    /// Out-of-range fields are reset to their defaults.
    pub fn load(&self) -> UserSettings {
        match self.try_load() {
            Ok(mut settings) => {
                for field in settings.repair() {
                    warn!(path = %self.path.display(), field, "stored value out of range, using default");
                }
                settings
            }
            Err(EngineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                UserSettings::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "settings unreadable, using defaults");
                UserSettings::default()
            }
        }
    }

    /// Load settings, surfacing any error
    pub fn try_load(&self) -> Result<UserSettings, EngineError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, settings: &UserSettings) -> Result<(), EngineError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
