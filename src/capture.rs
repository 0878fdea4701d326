//! Attribute capture.
//!
//! Walks the catalog in order, reads each attribute through the viewport
//! context and coerces it into the attribute's domain. An attribute that
//! cannot be read or coerced is skipped and reported; the rest of the capture
//! carries on.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::context::ViewportContext;
use crate::state::CapturedState;

/// An attribute left out of a capture, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAttribute {
    pub id: String,
    pub reason: String,
}

/// Result of a capture: the state plus whatever had to be skipped.
#[derive(Debug, Clone)]
pub struct Capture {
    pub state: CapturedState,
    pub skipped: Vec<SkippedAttribute>,
}

impl Capture {
    /// True when every catalog attribute made it into the state
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Read every catalog attribute from `context`.
///
/// Never mutates the viewport.
pub fn capture<C>(context: &C, catalog: &Catalog) -> Capture
where
    C: ViewportContext + ?Sized,
{
    let mut entries = Vec::with_capacity(catalog.len());
    let mut skipped = Vec::new();

    for spec in catalog.iter() {
        let raw = match context.query_attribute(spec) {
            Ok(value) => value,
            Err(err) => {
                warn!(attribute = spec.id, error = %err, "skipping attribute");
                skipped.push(SkippedAttribute {
                    id: spec.id.to_string(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let kind = raw.kind();
        let finite = raw.is_finite();
        match spec.domain.coerce(raw) {
            Some(value) => entries.push((spec.id.to_string(), value)),
            None => {
                let reason = if finite {
                    format!("{kind} value does not fit domain {}", spec.domain)
                } else {
                    format!("non-finite {kind} value")
                };
                warn!(attribute = spec.id, %reason, "skipping attribute");
                skipped.push(SkippedAttribute {
                    id: spec.id.to_string(),
                    reason,
                });
            }
        }
    }

    debug!(
        panel = context.panel().unwrap_or("<none>"),
        captured = entries.len(),
        skipped = skipped.len(),
        "capture finished"
    );

    Capture {
        state: CapturedState::from_entries(context.panel().map(str::to_string), entries),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeSpec, Target};
    use crate::context::SnapshotContext;
    use crate::types::{AttrGroup, AttrValue, Domain};

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            AttributeSpec::new(
                "shadows",
                AttrGroup::Display,
                Domain::Bool,
                Target::ModelEditor("shadows"),
            ),
            AttributeSpec::new(
                "multiSampleCount",
                AttrGroup::Hardware2,
                Domain::Int,
                Target::RenderGlobals("multiSampleCount"),
            ),
            AttributeSpec::new(
                "displayAppearance",
                AttrGroup::Display,
                Domain::Enum,
                Target::ModelEditor("displayAppearance"),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_capture_coerces_host_values() {
        let ctx = SnapshotContext::new("modelPanel4")
            .with_value("shadows", AttrValue::Int(1))
            .with_value("multiSampleCount", AttrValue::Float(8.0))
            .with_value("displayAppearance", AttrValue::Text("smoothShaded".into()));

        let result = capture(&ctx, &small_catalog());

        assert!(result.is_complete());
        assert_eq!(result.state.get("shadows"), Some(&AttrValue::Bool(true)));
        assert_eq!(result.state.get("multiSampleCount"), Some(&AttrValue::Int(8)));
        assert_eq!(result.state.panel(), Some("modelPanel4"));
    }

    #[test]
    fn test_capture_skips_values_outside_domain() {
        let ctx = SnapshotContext::new("modelPanel4")
            .with_value("shadows", AttrValue::Text("on".into()))
            .with_value("multiSampleCount", AttrValue::Int(4))
            .with_value("displayAppearance", AttrValue::Text("wireframe".into()));

        let result = capture(&ctx, &small_catalog());

        assert_eq!(result.state.len(), 2);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].id, "shadows");
        assert!(result.skipped[0].reason.contains("domain bool"));
    }

    #[test]
    fn test_capture_skips_non_finite_numbers() {
        let catalog = Catalog::builtin();
        let ctx = SnapshotContext::new("modelPanel4")
            .with_value("overscan", AttrValue::Float(f64::NAN))
            .with_value("hwFogColor", AttrValue::Color([0.5, f64::INFINITY, 0.5]))
            .with_value("shadows", AttrValue::Bool(true));

        let result = capture(&ctx, &catalog);

        assert!(!result.state.contains("overscan"));
        assert!(!result.state.contains("hwFogColor"));
        assert!(result.state.contains("shadows"));
        let skipped: Vec<&str> = result
            .skipped
            .iter()
            .filter(|s| s.reason.starts_with("non-finite"))
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(skipped, vec!["overscan", "hwFogColor"]);
    }

    #[test]
    fn test_capture_follows_catalog_order() {
        let ctx = SnapshotContext::new("modelPanel4")
            .with_value("displayAppearance", AttrValue::Text("wireframe".into()))
            .with_value("multiSampleCount", AttrValue::Int(4))
            .with_value("shadows", AttrValue::Bool(false));

        let result = capture(&ctx, &small_catalog());
        let ids: Vec<&str> = result.state.ids().collect();
        assert_eq!(ids, vec!["shadows", "multiSampleCount", "displayAppearance"]);
    }

    #[test]
    fn test_capture_of_empty_viewport_skips_everything() {
        let ctx = SnapshotContext::default();
        let catalog = Catalog::builtin();
        let result = capture(&ctx, &catalog);
        assert!(result.state.is_empty());
        assert_eq!(result.skipped.len(), catalog.len());
    }
}
