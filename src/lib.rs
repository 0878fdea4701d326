//! viewport-capture Library
//!
//! Captures the display state of a Maya viewport into a plain value, renders
//! it as a MEL script that replays the state, and keeps named presets on disk.

pub mod capture;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod paths;
pub mod preset;
pub mod state;
pub mod storage;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use capture::{capture, Capture, SkippedAttribute};
pub use catalog::{AttributeSpec, Catalog, Target};
pub use config::Settings;
pub use context::{SnapshotContext, ViewportContext};
pub use emit::{emit, render, Emission, OmittedStatement, Statement};
pub use error::{Result, ViewportCaptureError};
pub use paths::{host_app_dir, LocationSource, PathResolver, PresetStoreLocation};
pub use preset::Presets;
pub use state::CapturedState;
pub use storage::{FsStorage, MemoryStorage, PresetStorage};
pub use store::{sanitize_name, PresetStore};
pub use types::{AttrGroup, AttrValue, Domain};
