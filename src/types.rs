//! Value types shared by capture, emission and the preset files
//!
//! Viewport attributes come in a handful of shapes. `AttrValue` carries a
//! concrete value, `Domain` declares which shape an attribute accepts, and
//! `AttrGroup` places the attribute in one of the sections of the generated
//! script.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A concrete attribute value.
///
/// Serialized untagged so preset files read naturally: `true`, `4`, `0.5`,
/// `"smoothShaded"`, `[0.1, 0.1, 0.1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Color([f64; 3]),
    Text(String),
}

impl AttrValue {
    /// Short name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Color(_) => "color",
            AttrValue::Text(_) => "text",
        }
    }

    /// False for a float or color holding NaN or an infinity
    pub fn is_finite(&self) -> bool {
        match self {
            AttrValue::Float(f) => f.is_finite(),
            AttrValue::Color(rgb) => rgb.iter().all(|c| c.is_finite()),
            _ => true,
        }
    }
}

/// Declared value domain of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Bool,
    Int,
    Float,
    /// Named choice, rendered as a quoted string
    Enum,
    /// RGB triple
    Color,
}

impl Domain {
    /// Coerce a raw value reported by the host into this domain.
    ///
    /// Hosts are loose about numeric types (`getAttr` reports booleans as
    /// `0`/`1`, integers sometimes as floats), so lossless conversions are
    /// accepted. Non-finite numbers have no JSON or MEL form and are
    /// rejected. Anything else returns `None`.
    pub fn coerce(&self, value: AttrValue) -> Option<AttrValue> {
        match (self, value) {
            (Domain::Bool, AttrValue::Bool(b)) => Some(AttrValue::Bool(b)),
            (Domain::Bool, AttrValue::Int(0)) => Some(AttrValue::Bool(false)),
            (Domain::Bool, AttrValue::Int(1)) => Some(AttrValue::Bool(true)),

            (Domain::Int, AttrValue::Int(i)) => Some(AttrValue::Int(i)),
            (Domain::Int, AttrValue::Bool(b)) => Some(AttrValue::Int(i64::from(b))),
            (Domain::Int, AttrValue::Float(f))
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 =>
            {
                Some(AttrValue::Int(f as i64))
            }

            (Domain::Float, AttrValue::Float(f)) if f.is_finite() => Some(AttrValue::Float(f)),
            (Domain::Float, AttrValue::Int(i)) => Some(AttrValue::Float(i as f64)),

            (Domain::Enum, AttrValue::Text(s)) if !s.is_empty() => Some(AttrValue::Text(s)),

            (Domain::Color, AttrValue::Color(rgb)) if rgb.iter().all(|c| c.is_finite()) => {
                Some(AttrValue::Color(rgb))
            }

            _ => None,
        }
    }

    /// Check a value already claimed to be in this domain (no conversion).
    pub fn accepts(&self, value: &AttrValue) -> bool {
        matches!(
            (self, value),
            (Domain::Bool, AttrValue::Bool(_))
                | (Domain::Int, AttrValue::Int(_))
                | (Domain::Float, AttrValue::Float(_))
                | (Domain::Enum, AttrValue::Text(_))
                | (Domain::Color, AttrValue::Color(_))
        )
    }
}

/// Section of the generated script an attribute belongs to.
///
/// The string forms double as the section keys of the legacy preset layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttrGroup {
    CameraGate,
    CameraMask,
    #[strum(serialize = "camera_filmfit")]
    #[serde(rename = "camera_filmfit")]
    CameraFilmFit,
    PluginDisplay,
    Display,
    Background,
    #[strum(serialize = "hardware2")]
    Hardware2,
}

impl AttrGroup {
    /// Comment line that opens this section in the generated script
    pub fn heading(&self) -> &'static str {
        match self {
            Self::CameraGate => "Camera Gate Settings",
            Self::CameraMask => "Camera Mask Settings",
            Self::CameraFilmFit => "Camera Film Fit Settings",
            Self::PluginDisplay => "Plugin Display Settings",
            Self::Display => "Display Settings",
            Self::Background => "Background Settings",
            Self::Hardware2 => "Hardware 2.0 Settings",
        }
    }

    /// Camera sections are applied only when the panel has a camera
    pub fn needs_camera(&self) -> bool {
        matches!(self, Self::CameraGate | Self::CameraMask | Self::CameraFilmFit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_bool_coercion_accepts_zero_and_one() {
        assert_eq!(Domain::Bool.coerce(AttrValue::Int(1)), Some(AttrValue::Bool(true)));
        assert_eq!(Domain::Bool.coerce(AttrValue::Int(0)), Some(AttrValue::Bool(false)));
        assert_eq!(Domain::Bool.coerce(AttrValue::Int(2)), None);
        assert_eq!(Domain::Bool.coerce(AttrValue::Text("yes".into())), None);
    }

    #[test]
    fn test_int_coercion_rejects_fractional_floats() {
        assert_eq!(Domain::Int.coerce(AttrValue::Float(8.0)), Some(AttrValue::Int(8)));
        assert_eq!(Domain::Int.coerce(AttrValue::Float(8.5)), None);
        assert_eq!(Domain::Int.coerce(AttrValue::Float(f64::NAN)), None);
        assert_eq!(Domain::Int.coerce(AttrValue::Bool(true)), Some(AttrValue::Int(1)));
    }

    #[test]
    fn test_float_and_enum_coercion() {
        assert_eq!(Domain::Float.coerce(AttrValue::Int(2)), Some(AttrValue::Float(2.0)));
        assert_eq!(Domain::Enum.coerce(AttrValue::Text(String::new())), None);
        assert_eq!(
            Domain::Enum.coerce(AttrValue::Text("smoothShaded".into())),
            Some(AttrValue::Text("smoothShaded".into()))
        );
        assert_eq!(Domain::Color.coerce(AttrValue::Float(0.1)), None);
        assert_eq!(Domain::Float.coerce(AttrValue::Float(f64::NAN)), None);
        assert_eq!(Domain::Float.coerce(AttrValue::Float(f64::INFINITY)), None);
        assert_eq!(
            Domain::Color.coerce(AttrValue::Color([0.1, f64::NEG_INFINITY, 0.1])),
            None
        );
    }

    #[test]
    fn test_untagged_json_shapes() {
        let values: Vec<AttrValue> =
            serde_json::from_str(r#"[true, 4, 0.5, 1.0, "default", [0.1, 0.2, 0.3]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AttrValue::Bool(true),
                AttrValue::Int(4),
                AttrValue::Float(0.5),
                AttrValue::Float(1.0),
                AttrValue::Text("default".into()),
                AttrValue::Color([0.1, 0.2, 0.3]),
            ]
        );
    }

    #[test]
    fn test_group_names_match_legacy_sections() {
        let names: Vec<String> = AttrGroup::iter().map(|g| g.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "camera_gate",
                "camera_mask",
                "camera_filmfit",
                "plugin_display",
                "display",
                "background",
                "hardware2"
            ]
        );
        assert_eq!("camera_filmfit".parse::<AttrGroup>().unwrap(), AttrGroup::CameraFilmFit);
    }

    #[test]
    fn test_domain_display_roundtrip() {
        for domain in Domain::iter() {
            let parsed: Domain = domain.to_string().parse().unwrap();
            assert_eq!(parsed, domain);
        }
    }
}
