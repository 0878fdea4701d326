//! Error handling module for viewport-capture
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Capture and emission treat per-attribute errors as non-fatal and report them
//! alongside their partial results; everything else is returned to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for viewport-capture
#[derive(Error, Debug)]
pub enum ViewportCaptureError {
    /// The default preset directory could not be determined or created
    #[error("Could not prepare preset directory{}: {reason}", display_path(.path))]
    PathResolution {
        path: Option<PathBuf>,
        reason: String,
    },

    /// A preset could not be written (unwritable location or invalid name)
    #[error("Could not save preset '{name}': {reason}")]
    PresetWrite { name: String, reason: String },

    /// No preset with this name exists in the store
    #[error("Preset '{0}' not found")]
    PresetNotFound(String),

    /// A single attribute could not be read from the viewport
    #[error("Could not query '{id}': {reason}")]
    AttributeQuery { id: String, reason: String },

    /// A value is outside the declared domain of its attribute
    #[error("Unsupported value for '{id}': {reason}")]
    UnsupportedValue { id: String, reason: String },

    /// Catalog construction errors (duplicate or empty identifiers)
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Preset content that is neither the current nor the legacy layout
    #[error("Preset format error: {0}")]
    PresetFormat(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}

/// Result type alias for viewport-capture operations
pub type Result<T> = std::result::Result<T, ViewportCaptureError>;

// Convenient error constructors
impl ViewportCaptureError {
    /// Create a path resolution error
    pub fn path_resolution(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PathResolution {
            path,
            reason: reason.into(),
        }
    }

    /// Create a preset write error
    pub fn preset_write(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PresetWrite {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a preset-not-found error
    pub fn preset_not_found(name: impl Into<String>) -> Self {
        Self::PresetNotFound(name.into())
    }

    /// Create an attribute query error
    pub fn attribute_query(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AttributeQuery {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported value error
    pub fn unsupported_value(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid catalog error
    pub fn invalid_catalog(msg: impl Into<String>) -> Self {
        Self::InvalidCatalog(msg.into())
    }

    /// Create a preset format error
    pub fn preset_format(msg: impl Into<String>) -> Self {
        Self::PresetFormat(msg.into())
    }
}
