//! Captured viewport state.
//!
//! A `CapturedState` is an ordered snapshot of attribute values taken from one
//! viewport panel. It is built once by a capture (or a preset load) and then
//! only read; a new capture produces a new state.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::AttrValue;

/// Ordered mapping from attribute identifier to captured value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapturedState {
    panel: Option<String>,
    entries: Vec<(String, AttrValue)>,
}

impl CapturedState {
    /// Build a state from entries in order.
    ///
    /// A repeated identifier keeps its first value.
    pub fn from_entries<I>(panel: Option<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        let mut kept: Vec<(String, AttrValue)> = Vec::new();
        for (id, value) in entries {
            if kept.iter().any(|(existing, _)| *existing == id) {
                tracing::warn!(attribute = %id, "duplicate attribute in state, keeping first value");
                continue;
            }
            kept.push((id, value));
        }
        Self {
            panel,
            entries: kept,
        }
    }

    /// Viewport panel the state was captured from, if known
    pub fn panel(&self) -> Option<&str> {
        self.panel.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes as a JSON object whose key order follows the state order.
pub(crate) struct OrderedAttributes<'a>(pub &'a CapturedState);

impl Serialize for OrderedAttributes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.entries.len()))?;
        for (id, value) in &self.0.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

/// Deserializes a JSON object into entries, keeping document order and
/// rejecting repeated keys.
pub(crate) struct AttributeEntries(pub Vec<(String, AttrValue)>);

impl<'de> Deserialize<'de> for AttributeEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = AttributeEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute identifiers to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, AttrValue)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, value)) = access.next_entry::<String, AttrValue>()? {
                    if entries.iter().any(|(existing, _)| *existing == id) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate attribute '{id}'"
                        )));
                    }
                    entries.push((id, value));
                }
                Ok(AttributeEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
