//! Named preset files.
//!
//! One preset is one `<name>.json` file, stored flat in the resolved preset
//! directory. The store deals in raw text; `crate::preset` layers the
//! captured-state format on top.
//!
//! There is no locking. Two sessions saving the same name into a shared
//! directory race, and the last write wins.

use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{Result, ViewportCaptureError};
use crate::paths::PresetStoreLocation;
use crate::storage::PresetStorage;

/// File extension of preset files
pub const PRESET_EXTENSION: &str = "json";

/// Device names Windows refuses as file names, whatever the extension.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Make a user-entered preset name safe to use as a file stem.
///
/// Characters outside `[A-Za-z0-9 _.-]` become `_`; surrounding whitespace
/// and dots are trimmed. Returns an empty string when no ASCII letter or
/// digit survives.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
        trimmed.to_string()
    } else {
        String::new()
    }
}

/// Whether `name` can be used verbatim as a file stem inside the store
fn is_plain_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0'))
}

/// Whether a sanitized name collides with a reserved device name
pub fn is_reserved_name(sanitized: &str) -> bool {
    let stem = sanitized.split('.').next().unwrap_or(sanitized).trim();
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

/// Preset files in one directory.
pub struct PresetStore<S: PresetStorage> {
    storage: S,
    location: PresetStoreLocation,
}

impl<S: PresetStorage> PresetStore<S> {
    pub fn new(storage: S, location: PresetStoreLocation) -> Self {
        Self { storage, location }
    }

    pub fn location(&self) -> &PresetStoreLocation {
        &self.location
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn file_path(&self, sanitized: &str) -> PathBuf {
        self.location
            .dir()
            .join(format!("{sanitized}.{PRESET_EXTENSION}"))
    }

    /// Write `content` as preset `name`, replacing any existing preset.
    pub fn save(&self, name: &str, content: &str) -> Result<()> {
        let sanitized = sanitize_name(name);
        if sanitized.is_empty() {
            return Err(ViewportCaptureError::preset_write(
                name,
                "name is empty after removing unsupported characters",
            ));
        }
        if is_reserved_name(&sanitized) {
            return Err(ViewportCaptureError::preset_write(
                name,
                format!("'{sanitized}' is a reserved file name"),
            ));
        }
        if !self.storage.is_dir(self.location.dir()) {
            return Err(ViewportCaptureError::preset_write(
                name,
                format!("{} does not exist", self.location.dir().display()),
            ));
        }

        let path = self.file_path(&sanitized);
        self.storage.write(&path, content).map_err(|err| {
            ViewportCaptureError::preset_write(name, format!("{}: {err}", path.display()))
        })?;
        info!(preset = %sanitized, path = %path.display(), "saved preset");
        Ok(())
    }

    /// Whether preset `name` exists
    pub fn exists(&self, name: &str) -> bool {
        let sanitized = sanitize_name(name);
        !sanitized.is_empty() && self.storage.is_file(&self.file_path(&sanitized))
    }

    /// Preset names, sorted case-insensitively.
    ///
    /// A missing directory is an empty list, not an error.
    pub fn list(&self) -> Result<Vec<String>> {
        let files = match self.storage.list_files(self.location.dir()) {
            Ok(files) => files,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %self.location.dir().display(), "preset directory missing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut names: Vec<String> = files
            .iter()
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(PRESET_EXTENSION))
            })
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
            .collect();

        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        names.dedup();
        Ok(names)
    }

    /// Read preset `name`.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.existing_path(name)?;
        Ok(self.storage.read_to_string(&path)?)
    }

    /// Remove preset `name`.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.existing_path(name)?;
        self.storage.remove_file(&path)?;
        info!(preset = name, path = %path.display(), "deleted preset");
        Ok(())
    }

    /// Path of an existing preset. The name is tried verbatim first, so
    /// files written under unsanitized names (as `list` reports them) stay
    /// reachable, then in sanitized form.
    fn existing_path(&self, name: &str) -> Result<PathBuf> {
        if is_plain_file_stem(name) {
            let path = self.file_path(name);
            if self.storage.is_file(&path) {
                return Ok(path);
            }
        }
        let sanitized = sanitize_name(name);
        if sanitized.is_empty() {
            return Err(ViewportCaptureError::preset_not_found(name));
        }
        let path = self.file_path(&sanitized);
        if !self.storage.is_file(&path) {
            return Err(ViewportCaptureError::preset_not_found(name));
        }
        Ok(path)
    }
}
