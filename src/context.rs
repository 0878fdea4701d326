//! Viewport context port.
//!
//! Capture never talks to the host application directly. It asks a
//! `ViewportContext` for one attribute at a time, so the core runs the same
//! against a live host adapter, a saved snapshot or a test fake.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::AttributeSpec;
use crate::error::{Result, ViewportCaptureError};
use crate::types::AttrValue;

/// Read-only access to the live viewport.
pub trait ViewportContext {
    /// Handle of the panel being captured (e.g. `modelPanel4`), if any.
    fn panel(&self) -> Option<&str>;

    /// Read the current value of one attribute.
    ///
    /// Implementations return `AttributeQuery` when the attribute does not
    /// exist in the running host version; capture skips it and moves on.
    fn query_attribute(&self, spec: &AttributeSpec) -> Result<AttrValue>;
}

/// A viewport recorded as plain values.
///
/// The on-disk form is
///
/// ```json
/// { "panel": "modelPanel4", "values": { "shadows": true, "overscan": 1.0 } }
/// ```
///
/// Attributes absent from `values` behave like features missing from an
/// older host release.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotContext {
    #[serde(default)]
    panel: Option<String>,
    #[serde(default)]
    values: HashMap<String, AttrValue>,
    #[serde(skip)]
    failures: HashMap<String, String>,
}

impl SnapshotContext {
    pub fn new(panel: impl Into<String>) -> Self {
        Self {
            panel: Some(panel.into()),
            ..Self::default()
        }
    }

    /// Builder: record a value for `id`.
    pub fn with_value(mut self, id: impl Into<String>, value: AttrValue) -> Self {
        self.values.insert(id.into(), value);
        self
    }

    /// Builder: make queries for `id` fail with `reason`.
    pub fn with_failure(mut self, id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(id.into(), reason.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl ViewportContext for SnapshotContext {
    fn panel(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    fn query_attribute(&self, spec: &AttributeSpec) -> Result<AttrValue> {
        if let Some(reason) = self.failures.get(spec.id) {
            return Err(ViewportCaptureError::attribute_query(spec.id, reason.clone()));
        }
        self.values.get(spec.id).cloned().ok_or_else(|| {
            ViewportCaptureError::attribute_query(spec.id, "not available in this viewport")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_snapshot_from_json() {
        let ctx = SnapshotContext::from_json(
            r#"{"panel": "modelPanel4", "values": {"shadows": true, "overscan": 1.3}}"#,
        )
        .unwrap();
        let catalog = Catalog::builtin();

        assert_eq!(ctx.panel(), Some("modelPanel4"));
        assert_eq!(
            ctx.query_attribute(catalog.get("shadows").unwrap()).unwrap(),
            AttrValue::Bool(true)
        );
        assert_eq!(
            ctx.query_attribute(catalog.get("overscan").unwrap()).unwrap(),
            AttrValue::Float(1.3)
        );
    }

    #[test]
    fn test_missing_value_is_query_error() {
        let ctx = SnapshotContext::new("modelPanel1");
        let catalog = Catalog::builtin();
        let err = ctx.query_attribute(catalog.get("ssaoEnable").unwrap()).unwrap_err();
        assert!(matches!(err, ViewportCaptureError::AttributeQuery { .. }));
    }

    #[test]
    fn test_configured_failure_wins_over_value() {
        let ctx = SnapshotContext::new("modelPanel1")
            .with_value("grid", AttrValue::Bool(true))
            .with_failure("grid", "flag removed");
        let catalog = Catalog::builtin();
        let err = ctx.query_attribute(catalog.get("grid").unwrap()).unwrap_err();
        assert!(err.to_string().contains("flag removed"));
    }

    #[test]
    fn test_snapshot_without_panel() {
        let ctx = SnapshotContext::from_json(r#"{"values": {}}"#).unwrap();
        assert!(ctx.panel().is_none());
    }
}
