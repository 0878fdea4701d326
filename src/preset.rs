//! Preset file format and the typed preset service.
//!
//! Presets are pretty-printed JSON:
//!
//! ```json
//! {
//!   "format": "viewport-capture/1",
//!   "panel": "modelPanel4",
//!   "attributes": {
//!     "displayFilmGate": false,
//!     "backgroundColor": [0.36, 0.36, 0.36]
//!   }
//! }
//! ```
//!
//! Attribute order in the file is the capture order. Files written by the
//! earlier Python tool (one object per section: `camera_gate`, `display`,
//! `background`, `hardware2`, ...) load too, so a shared preset directory
//! keeps working across the switch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::{Result, ViewportCaptureError};
use crate::state::{AttributeEntries, CapturedState, OrderedAttributes};
use crate::storage::PresetStorage;
use crate::store::PresetStore;
use crate::types::{AttrGroup, AttrValue};

/// Format tag written into every preset
pub const PRESET_FORMAT: &str = "viewport-capture/1";

#[derive(Serialize)]
struct PresetDocumentRef<'a> {
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    panel: Option<&'a str>,
    attributes: OrderedAttributes<'a>,
}

#[derive(Deserialize)]
struct PresetDocument {
    #[serde(default)]
    panel: Option<String>,
    attributes: AttributeEntries,
}

#[derive(Deserialize)]
struct FormatProbe {
    #[serde(default)]
    format: Option<String>,
}

#[derive(Deserialize)]
struct LegacyPreset {
    #[serde(default)]
    panel: Option<String>,
    #[serde(flatten)]
    sections: BTreeMap<String, serde_json::Value>,
}

/// Serialize a state as preset JSON.
///
/// Fails with `UnsupportedValue` on non-finite numbers, which JSON would
/// silently turn into `null`.
pub fn to_json(state: &CapturedState) -> Result<String> {
    if let Some((id, value)) = state.iter().find(|(_, value)| !value.is_finite()) {
        return Err(ViewportCaptureError::unsupported_value(
            id,
            format!("non-finite {} cannot be stored", value.kind()),
        ));
    }
    let document = PresetDocumentRef {
        format: PRESET_FORMAT,
        panel: state.panel(),
        attributes: OrderedAttributes(state),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse preset JSON in either the current or the legacy layout.
pub fn from_json(text: &str, catalog: &Catalog) -> Result<CapturedState> {
    let probe: FormatProbe = serde_json::from_str(text)?;
    match probe.format.as_deref() {
        Some(PRESET_FORMAT) => {
            let document: PresetDocument = serde_json::from_str(text)?;
            Ok(CapturedState::from_entries(
                document.panel,
                document.attributes.0,
            ))
        }
        Some(other) => Err(ViewportCaptureError::preset_format(format!(
            "unsupported preset format '{other}'"
        ))),
        None => from_legacy_json(text, catalog),
    }
}

fn from_legacy_json(text: &str, catalog: &Catalog) -> Result<CapturedState> {
    let legacy: LegacyPreset = serde_json::from_str(text)?;

    let mut known_sections = 0;
    let mut entries: Vec<(usize, String, AttrValue)> = Vec::new();

    for (section, body) in &legacy.sections {
        let Ok(group) = section.parse::<AttrGroup>() else {
            warn!(section = %section, "ignoring unknown legacy preset section");
            continue;
        };
        let serde_json::Value::Object(fields) = body else {
            return Err(ViewportCaptureError::preset_format(format!(
                "legacy section '{section}' is not an object"
            )));
        };
        known_sections += 1;

        for (key, raw) in fields {
            let Some(spec) = catalog.find_legacy(group, key) else {
                warn!(section = %section, key = %key, "ignoring unknown legacy attribute");
                continue;
            };
            let value = serde_json::from_value::<AttrValue>(raw.clone())
                .ok()
                .and_then(|v| spec.domain.coerce(v));
            match value {
                Some(value) => {
                    let position = catalog.position(spec.id).unwrap_or(usize::MAX);
                    entries.push((position, spec.id.to_string(), value));
                }
                None => {
                    warn!(attribute = spec.id, "ignoring legacy value outside its domain");
                }
            }
        }
    }

    if known_sections == 0 {
        return Err(ViewportCaptureError::preset_format(
            "neither a viewport-capture preset nor a legacy preset",
        ));
    }

    entries.sort_by_key(|(position, _, _)| *position);
    Ok(CapturedState::from_entries(
        legacy.panel,
        entries.into_iter().map(|(_, id, value)| (id, value)),
    ))
}

/// Captured states stored as named presets.
pub struct Presets<S: PresetStorage> {
    store: PresetStore<S>,
    catalog: Catalog,
}

impl<S: PresetStorage> Presets<S> {
    pub fn new(store: PresetStore<S>, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &PresetStore<S> {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn save(&self, name: &str, state: &CapturedState) -> Result<()> {
        let json = to_json(state)?;
        self.store.save(name, &json)
    }

    pub fn load(&self, name: &str) -> Result<CapturedState> {
        let text = self.store.load(name)?;
        from_json(&text, &self.catalog)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }
}
