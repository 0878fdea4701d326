//! Declarative catalog of capturable viewport attributes.
//!
//! Every attribute the tool knows about is one `AttributeSpec` row. Capture
//! and emission walk the same table generically, so supporting a new display
//! setting means adding a row here rather than another branch in either.
//!
//! # Targets
//!
//! | Target          | Query statement                          | Set statement |
//! |-----------------|------------------------------------------|---------------|
//! | `ModelEditor`   | `modelEditor -q -<flag> $panel`          | `modelEditor -e -<flag> <v> $panel;` |
//! | `Camera`        | `camera -q -<flag> $camera`              | `camera -e -<flag> <v> $camera;` |
//! | `PluginFilter`  | `modelEditor -q -queryPluginObjects <filter> $panel` | `modelEditor -e -pluginObjects <filter> <v> $panel;` |
//! | `DisplayPref`   | `displayPref -q -<flag>`                 | `displayPref -<flag> <v>;` |
//! | `RgbColor`      | `displayRGBColor -q "<name>"`            | `displayRGBColor "<name>" r g b;` |
//! | `RenderGlobals` | `getAttr "hardwareRenderingGlobals.<a>"` | `setAttr "hardwareRenderingGlobals.<a>" <v>;` |

use std::collections::HashSet;

use crate::error::{Result, ViewportCaptureError};
use crate::types::{AttrGroup, Domain};

/// Node holding the Viewport 2.0 render settings
pub const RENDER_GLOBALS_NODE: &str = "hardwareRenderingGlobals";

/// The host command family used to read and write one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A `modelEditor` flag on the viewport panel
    ModelEditor(&'static str),
    /// A `camera` flag on the panel's active camera
    Camera(&'static str),
    /// A plugin display filter toggled through `modelEditor -pluginObjects`
    PluginFilter {
        plugin: &'static str,
        filter: &'static str,
    },
    /// A global `displayPref` flag
    DisplayPref(&'static str),
    /// A named `displayRGBColor` entry
    RgbColor(&'static str),
    /// An attribute on the `hardwareRenderingGlobals` node
    RenderGlobals(&'static str),
}

impl Target {
    /// MEL expression that reads the current value on a live host.
    ///
    /// Host adapters evaluate this; `$panel` and `$camera` must be bound by
    /// the caller.
    pub fn query_statement(&self) -> String {
        match self {
            Target::ModelEditor(flag) => format!("modelEditor -q -{flag} $panel"),
            Target::Camera(flag) => format!("camera -q -{flag} $camera"),
            Target::PluginFilter { filter, .. } => {
                format!("modelEditor -q -queryPluginObjects {filter} $panel")
            }
            Target::DisplayPref(flag) => format!("displayPref -q -{flag}"),
            Target::RgbColor(name) => format!("displayRGBColor -q \"{name}\""),
            Target::RenderGlobals(attr) => {
                format!("getAttr \"{RENDER_GLOBALS_NODE}.{attr}\"")
            }
        }
    }

    /// Whether booleans are written as `1`/`0` (`setAttr`) instead of
    /// `true`/`false` (command flags).
    pub fn numeric_bools(&self) -> bool {
        matches!(self, Target::RenderGlobals(_))
    }
}

/// One capturable display property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Stable identifier, unique within a catalog
    pub id: &'static str,
    pub group: AttrGroup,
    pub domain: Domain,
    pub target: Target,
    /// Boolean attribute that must be `true` for this one to be applied
    pub requires: Option<&'static str>,
}

impl AttributeSpec {
    pub const fn new(
        id: &'static str,
        group: AttrGroup,
        domain: Domain,
        target: Target,
    ) -> Self {
        Self {
            id,
            group,
            domain,
            target,
            requires: None,
        }
    }

    /// Only apply this attribute when `guard` was captured as `true`.
    pub const fn requires(mut self, guard: &'static str) -> Self {
        self.requires = Some(guard);
        self
    }

    /// Key this attribute had inside its section of the legacy preset layout.
    pub fn legacy_key(&self) -> &'static str {
        match self.target {
            Target::DisplayPref("displayGradient") => "gradient",
            Target::RgbColor("background") => "color",
            Target::RgbColor("backgroundTop") => "topColor",
            Target::RgbColor("backgroundBottom") => "bottomColor",
            Target::PluginFilter { plugin, .. } => plugin,
            _ => self.id,
        }
    }
}

/// Validated, ordered list of attribute specs.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Vec<AttributeSpec>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or repeated identifiers.
    pub fn new(specs: Vec<AttributeSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if spec.id.trim().is_empty() {
                return Err(ViewportCaptureError::invalid_catalog(
                    "attribute identifier must not be empty",
                ));
            }
            if !seen.insert(spec.id) {
                return Err(ViewportCaptureError::invalid_catalog(format!(
                    "duplicate attribute identifier '{}'",
                    spec.id
                )));
            }
        }
        Ok(Self { specs })
    }

    /// The full attribute set of the tool, in script order.
    pub fn builtin() -> Self {
        Self {
            specs: BUILTIN.to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.iter()
    }

    pub fn get(&self, id: &str) -> Option<&AttributeSpec> {
        self.specs.iter().find(|spec| spec.id == id)
    }

    /// Position of `id` in catalog order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.id == id)
    }

    /// Find the spec a legacy preset stored under `section`/`key`.
    pub fn find_legacy(&self, section: AttrGroup, key: &str) -> Option<&AttributeSpec> {
        self.specs
            .iter()
            .find(|spec| spec.group == section && spec.legacy_key() == key)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const fn editor(id: &'static str) -> AttributeSpec {
    AttributeSpec::new(id, AttrGroup::Display, Domain::Bool, Target::ModelEditor(id))
}

const fn editor_enum(id: &'static str) -> AttributeSpec {
    AttributeSpec::new(id, AttrGroup::Display, Domain::Enum, Target::ModelEditor(id))
}

const fn globals(id: &'static str, domain: Domain) -> AttributeSpec {
    AttributeSpec::new(id, AttrGroup::Hardware2, domain, Target::RenderGlobals(id))
}

const BUILTIN: &[AttributeSpec] = &[
    // Camera
    AttributeSpec::new(
        "displayFilmGate",
        AttrGroup::CameraGate,
        Domain::Bool,
        Target::Camera("displayFilmGate"),
    ),
    AttributeSpec::new(
        "displayResolution",
        AttrGroup::CameraGate,
        Domain::Bool,
        Target::Camera("displayResolution"),
    ),
    AttributeSpec::new(
        "overscan",
        AttrGroup::CameraGate,
        Domain::Float,
        Target::Camera("overscan"),
    ),
    AttributeSpec::new(
        "displayGateMask",
        AttrGroup::CameraMask,
        Domain::Bool,
        Target::Camera("displayGateMask"),
    ),
    AttributeSpec::new(
        "filmFit",
        AttrGroup::CameraFilmFit,
        Domain::Enum,
        Target::Camera("filmFit"),
    ),
    // Plugins
    AttributeSpec::new(
        "gpuCache",
        AttrGroup::PluginDisplay,
        Domain::Bool,
        Target::PluginFilter {
            plugin: "gpuCache",
            filter: "gpuCacheDisplayFilter",
        },
    ),
    // Display toggles
    editor("nurbsCurves"),
    editor("nurbsSurfaces"),
    editor("polymeshes"),
    editor("subdivSurfaces"),
    editor("planes"),
    editor("lights"),
    editor("joints"),
    editor("ikHandles"),
    editor("deformers"),
    editor("dynamics"),
    editor("fluids"),
    editor("hairSystems"),
    editor("follicles"),
    editor("nCloths"),
    editor("nParticles"),
    editor("nRigids"),
    editor("dynamicConstraints"),
    editor("locators"),
    editor("manipulators"),
    editor("grid"),
    editor("handles"),
    editor("pivots"),
    editor("textures"),
    editor("strokes"),
    editor("selectionHiliteDisplay"),
    editor("headsUpDisplay"),
    editor_enum("displayLights"),
    editor("wireframeOnShaded"),
    editor("wireframe"),
    editor("xray"),
    editor("backfaceCulling"),
    editor("smoothWireframe"),
    editor("displayTextures"),
    editor_enum("displayAppearance"),
    editor("useDefaultMaterial"),
    editor("hwFog"),
    editor("fogging"),
    editor("dimensions"),
    editor("cv"),
    editor("particleInstancers"),
    editor("motionTrails"),
    editor("cameras"),
    editor("imagePlane"),
    editor("hulls"),
    editor("twoSidedLighting"),
    editor("shadows"),
    editor("jointXray"),
    editor("activeComponentsXray"),
    // Background
    AttributeSpec::new(
        "backgroundGradient",
        AttrGroup::Background,
        Domain::Bool,
        Target::DisplayPref("displayGradient"),
    ),
    AttributeSpec::new(
        "backgroundTopColor",
        AttrGroup::Background,
        Domain::Color,
        Target::RgbColor("backgroundTop"),
    ),
    AttributeSpec::new(
        "backgroundColor",
        AttrGroup::Background,
        Domain::Color,
        Target::RgbColor("background"),
    ),
    AttributeSpec::new(
        "backgroundBottomColor",
        AttrGroup::Background,
        Domain::Color,
        Target::RgbColor("backgroundBottom"),
    )
    .requires("backgroundGradient"),
    // Viewport 2.0
    globals("multiSampleEnable", Domain::Bool),
    globals("multiSampleCount", Domain::Int),
    globals("ssaoEnable", Domain::Bool),
    globals("ssaoAmount", Domain::Float),
    globals("ssaoRadius", Domain::Float),
    globals("ssaoFilterRadius", Domain::Float),
    globals("motionBlurEnable", Domain::Bool),
    globals("motionBlurSampleCount", Domain::Int),
    globals("motionBlurShutterOpenFraction", Domain::Float),
    globals("motionBlurShutterCloseFraction", Domain::Float),
    globals("transparencyAlgorithm", Domain::Int),
    globals("transparencyQuality", Domain::Float),
    globals("transparencyShadowDepth", Domain::Int),
    globals("lineAAEnable", Domain::Bool),
    globals("maxHardwareLines", Domain::Int),
    globals("minimumPixelWidth", Domain::Float),
    globals("hwFogEnable", Domain::Bool),
    globals("hwFogMode", Domain::Int),
    globals("hwFogStart", Domain::Float),
    globals("hwFogEnd", Domain::Float),
    globals("hwFogDensity", Domain::Float),
    globals("hwFogColor", Domain::Color),
    globals("hwFogFalloff", Domain::Int),
    globals("hwFogRatio", Domain::Float),
    globals("defaultLightIntensity", Domain::Float),
    globals("consolidateWorld", Domain::Bool),
    globals("maxHardwareLights", Domain::Int),
    globals("transparentShadow", Domain::Bool),
    globals("alphaCutPrepass", Domain::Bool),
];
