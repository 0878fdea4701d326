//! Preset directory resolution.
//!
//! Runs once per session. A configured custom directory wins when it exists
//! and accepts new files; otherwise presets live under the host's per-user
//! application directory in `viewportCapture/presets`, which is created on
//! demand.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};
use strum::Display;
use tracing::{debug, info, warn};

use crate::error::{Result, ViewportCaptureError};
use crate::storage::PresetStorage;

/// Environment variable the host uses to relocate its per-user directory
pub const HOST_APP_DIR_ENV: &str = "MAYA_APP_DIR";

/// Path segments appended to the host's per-user directory
pub const DEFAULT_SUBDIR: [&str; 2] = ["viewportCapture", "presets"];

/// Where a resolved preset directory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LocationSource {
    Custom,
    Default,
}

/// The preset directory chosen for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetStoreLocation {
    dir: PathBuf,
    source: LocationSource,
}

impl PresetStoreLocation {
    pub fn new(dir: impl Into<PathBuf>, source: LocationSource) -> Self {
        Self {
            dir: dir.into(),
            source,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source(&self) -> LocationSource {
        self.source
    }
}

impl fmt::Display for PresetStoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.dir.display(), self.source)
    }
}

/// Host per-user application directory.
///
/// `MAYA_APP_DIR` when set, otherwise the platform default:
/// `<Documents>/maya` on Windows, `~/Library/Preferences/Autodesk/maya` on
/// macOS, `~/maya` elsewhere.
pub fn host_app_dir() -> Option<PathBuf> {
    let from_env = env::var_os(HOST_APP_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    from_env.or_else(platform_app_dir)
}

fn platform_app_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        UserDirs::new()?
            .document_dir()
            .map(|docs| docs.join("maya"))
    } else if cfg!(target_os = "macos") {
        BaseDirs::new().map(|base| {
            base.home_dir()
                .join("Library")
                .join("Preferences")
                .join("Autodesk")
                .join("maya")
        })
    } else {
        BaseDirs::new().map(|base| base.home_dir().join("maya"))
    }
}

/// Chooses the preset directory.
pub struct PathResolver<'a, S: PresetStorage> {
    storage: &'a S,
    host_app_dir: Option<PathBuf>,
}

impl<'a, S: PresetStorage> PathResolver<'a, S> {
    /// Resolver rooted at an explicit host directory (`None` when unknown).
    pub fn new(storage: &'a S, host_app_dir: Option<PathBuf>) -> Self {
        Self {
            storage,
            host_app_dir,
        }
    }

    /// Resolver rooted at the detected host directory.
    pub fn detect(storage: &'a S) -> Self {
        Self::new(storage, host_app_dir())
    }

    /// Directory used when no custom path applies
    pub fn default_dir(&self) -> Option<PathBuf> {
        self.host_app_dir
            .as_ref()
            .map(|root| DEFAULT_SUBDIR.iter().fold(root.clone(), |p, seg| p.join(seg)))
    }

    /// Pick the preset directory for this session.
    ///
    /// A custom path that is missing, relative, or not writable falls back
    /// to the default. Only a default that cannot be created is an error.
    pub fn resolve(&self, custom: Option<&str>) -> Result<PresetStoreLocation> {
        if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
            let path = Path::new(custom);
            if !path.is_absolute() {
                warn!(path = custom, "custom preset path is not absolute, using default");
            } else if !self.storage.is_dir(path) {
                warn!(path = custom, "custom preset path does not exist, using default");
            } else if !self.storage.is_writable_dir(path) {
                warn!(path = custom, "custom preset path is not writable, using default");
            } else {
                debug!(path = custom, "using custom preset path");
                return Ok(PresetStoreLocation::new(path, LocationSource::Custom));
            }
        }

        let dir = self.default_dir().ok_or_else(|| {
            ViewportCaptureError::path_resolution(None, "host user directory is unknown")
        })?;
        if !dir.is_absolute() {
            return Err(ViewportCaptureError::path_resolution(
                Some(dir),
                "host user directory is not absolute",
            ));
        }

        if !self.storage.is_dir(&dir) {
            self.storage.create_dir_all(&dir).map_err(|err| {
                ViewportCaptureError::path_resolution(Some(dir.clone()), err.to_string())
            })?;
            info!(path = %dir.display(), "created preset directory");
        }

        Ok(PresetStoreLocation::new(dir, LocationSource::Default))
    }
}
