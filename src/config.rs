//! Settings file handling.
//!
//! The tool reads one small JSON settings file at startup. It carries the
//! optional custom preset directory (typically a shared studio drive) and,
//! for unusual installs, an explicit host user directory.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the settings file inside the platform config directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Startup settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preferred preset directory; ignored unless it exists and is writable
    pub custom_preset_path: Option<String>,
    /// Host user directory, overriding `MAYA_APP_DIR` and platform detection
    pub host_app_dir: Option<PathBuf>,
}

impl Settings {
    /// Default settings file location (e.g. `~/.config/viewport-capture/settings.json`)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "viewportCapture", "viewport-capture")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        Ok(settings)
    }

    /// Load the explicit file if given, else the default file if present,
    /// else defaults. An explicit file that is missing is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let settings = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.host_app_dir {
            if !dir.is_absolute() {
                anyhow::bail!("host_app_dir must be an absolute path, got {:?}", dir);
            }
        }
        Ok(())
    }

    /// Apply a command-line preset directory on top of the file value
    pub fn with_preset_path(mut self, preset_path: Option<String>) -> Self {
        if preset_path.is_some() {
            self.custom_preset_path = preset_path;
        }
        self
    }
}
