//! MEL script emitter.
//!
//! Turns a `CapturedState` into a standalone MEL script that re-applies it to
//! whichever model panel has focus when the script runs. Output depends only
//! on the state and the catalog, so identical input always yields identical
//! bytes.
//!
//! # Value formatting
//!
//! | Domain  | Command flags          | `setAttr` |
//! |---------|------------------------|-----------|
//! | bool    | `true` / `false`       | `1` / `0` |
//! | int     | `4`                    | `4` |
//! | float   | `0.1`, `1.0`, `0.0000001` | same |
//! | enum    | `"smoothShaded"`       | same |
//! | color   | `0.1 0.1 0.1`          | `-type double3 0.1 0.1 0.1` |
//!
//! A value that does not fit its attribute's domain (or a non-finite float,
//! or an enum string that cannot be quoted safely) drops that one statement.
//! The drop is logged and listed in `Emission::omitted`; the rest of the
//! script is still produced.
//!
//! The `hwFog` viewport toggle also sets `hwFogEnable` on the render globals,
//! so fog settings replay even when only the toggle was captured.

use tracing::{debug, warn};

use crate::catalog::{AttributeSpec, Catalog, RENDER_GLOBALS_NODE, Target};
use crate::error::{Result, ViewportCaptureError};
use crate::state::CapturedState;
use crate::types::{AttrGroup, AttrValue};

/// Model editor flag whose value is mirrored to `hwFogEnable`
const FOG_TOGGLE_FLAG: &str = "hwFog";

/// Name of the procedure the script defines and then calls
pub const APPLY_PROC: &str = "viewportCaptureApply";

/// Script text for an empty state
pub const EMPTY_SCRIPT: &str = "// No settings captured";

const INDENT: &str = "    ";

/// MEL lines applying one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: String,
    pub group: AttrGroup,
    /// Unindented lines; nested blocks carry their own relative indent
    pub lines: Vec<String>,
}

impl Statement {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A state entry that produced no statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmittedStatement {
    pub id: String,
    pub reason: String,
}

/// Output of `emit`.
#[derive(Debug, Clone)]
pub struct Emission {
    pub statements: Vec<Statement>,
    pub omitted: Vec<OmittedStatement>,
    script: String,
}

impl Emission {
    /// The complete MEL script
    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn into_script(self) -> String {
        self.script
    }
}

/// Render `state` as a MEL script, in catalog order.
pub fn emit(state: &CapturedState, catalog: &Catalog) -> Emission {
    if state.is_empty() {
        return Emission {
            statements: Vec::new(),
            omitted: Vec::new(),
            script: EMPTY_SCRIPT.to_string(),
        };
    }

    let mut statements = Vec::new();
    let mut omitted = Vec::new();

    for spec in catalog.iter() {
        let Some(value) = state.get(spec.id) else {
            continue;
        };

        if let Some(guard) = spec.requires {
            if state.get(guard) != Some(&AttrValue::Bool(true)) {
                debug!(attribute = spec.id, guard, "guard not enabled, not applying");
                continue;
            }
        }

        match render(spec, value) {
            Ok(lines) => statements.push(Statement {
                id: spec.id.to_string(),
                group: spec.group,
                lines,
            }),
            Err(err) => {
                warn!(attribute = spec.id, error = %err, "omitting statement");
                omitted.push(OmittedStatement {
                    id: spec.id.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    for id in state.ids().filter(|id| catalog.get(id).is_none()) {
        warn!(attribute = id, "omitting statement for unknown attribute");
        omitted.push(OmittedStatement {
            id: id.to_string(),
            reason: "attribute is not in the catalog".to_string(),
        });
    }

    let script = assemble(&statements);
    Emission {
        statements,
        omitted,
        script,
    }
}

/// Render the set statement(s) for one attribute value.
pub fn render(spec: &AttributeSpec, value: &AttrValue) -> Result<Vec<String>> {
    if !spec.domain.accepts(value) {
        return Err(ViewportCaptureError::unsupported_value(
            spec.id,
            format!("expected {}, found {}", spec.domain, value.kind()),
        ));
    }

    let lit = || literal(spec, value);

    let lines = match spec.target {
        Target::ModelEditor(FOG_TOGGLE_FLAG) => {
            let enable = if matches!(value, AttrValue::Bool(true)) { 1 } else { 0 };
            vec![
                format!("modelEditor -e -{FOG_TOGGLE_FLAG} {} $panel;", lit()?),
                format!("if (!`objExists \"{RENDER_GLOBALS_NODE}\"`)"),
                "{".to_string(),
                format!("{INDENT}createNode \"{RENDER_GLOBALS_NODE}\";"),
                "}".to_string(),
                format!("setAttr \"{RENDER_GLOBALS_NODE}.hwFogEnable\" {enable};"),
            ]
        }
        Target::ModelEditor(flag) => {
            vec![format!("modelEditor -e -{flag} {} $panel;", lit()?)]
        }
        Target::Camera(flag) => vec![format!("camera -e -{flag} {} $camera;", lit()?)],
        Target::DisplayPref(flag) => vec![format!("displayPref -{flag} {};", lit()?)],
        Target::RgbColor(name) => vec![format!("displayRGBColor \"{name}\" {};", lit()?)],
        Target::RenderGlobals(attr) => {
            let literal = lit()?;
            if matches!(value, AttrValue::Color(_)) {
                vec![format!(
                    "setAttr \"{RENDER_GLOBALS_NODE}.{attr}\" -type double3 {literal};"
                )]
            } else {
                vec![format!("setAttr \"{RENDER_GLOBALS_NODE}.{attr}\" {literal};")]
            }
        }
        Target::PluginFilter { plugin, filter } => {
            let enabled = matches!(value, AttrValue::Bool(true));
            let literal = lit()?;
            if enabled {
                vec![
                    format!("if (!`pluginInfo -q -loaded \"{plugin}\"`)"),
                    "{".to_string(),
                    format!("{INDENT}loadPlugin \"{plugin}\";"),
                    "}".to_string(),
                    format!("modelEditor -e -pluginObjects {filter} {literal} $panel;"),
                ]
            } else {
                vec![
                    format!("if (`pluginInfo -q -loaded \"{plugin}\"`)"),
                    "{".to_string(),
                    format!("{INDENT}modelEditor -e -pluginObjects {filter} {literal} $panel;"),
                    "}".to_string(),
                ]
            }
        }
    };
    Ok(lines)
}

fn literal(spec: &AttributeSpec, value: &AttrValue) -> Result<String> {
    match value {
        AttrValue::Bool(b) if spec.target.numeric_bools() => {
            Ok(if *b { "1" } else { "0" }.to_string())
        }
        AttrValue::Bool(b) => Ok(b.to_string()),
        AttrValue::Int(i) => Ok(i.to_string()),
        AttrValue::Float(f) => float_literal(spec.id, *f),
        AttrValue::Color(rgb) => {
            let parts = rgb
                .iter()
                .map(|c| float_literal(spec.id, *c))
                .collect::<Result<Vec<_>>>()?;
            Ok(parts.join(" "))
        }
        AttrValue::Text(s) => quoted(spec.id, s),
    }
}

/// Shortest round-trip decimal that always carries a fractional part and
/// never uses exponent notation.
fn float_literal(id: &str, value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ViewportCaptureError::unsupported_value(
            id,
            format!("non-finite number {value}"),
        ));
    }
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Ok(text)
}

fn quoted(id: &str, text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(ViewportCaptureError::unsupported_value(id, "empty choice"));
    }
    if text.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return Err(ViewportCaptureError::unsupported_value(
            id,
            format!("choice {text:?} cannot be quoted"),
        ));
    }
    Ok(format!("\"{text}\""))
}

fn assemble(statements: &[Statement]) -> String {
    let mut out: Vec<String> = PREAMBLE.iter().map(|line| line.to_string()).collect();

    let mut current: Option<AttrGroup> = None;
    let mut camera_open = false;

    for statement in statements {
        if current != Some(statement.group) {
            if camera_open && !statement.group.needs_camera() {
                out.push(format!("{INDENT}}}"));
                camera_open = false;
            }
            out.push(String::new());
            if statement.group.needs_camera() && !camera_open {
                out.push(format!("{INDENT}if ($camera != \"\")"));
                out.push(format!("{INDENT}{{"));
                camera_open = true;
            }
            let indent = if camera_open { "        " } else { INDENT };
            out.push(format!("{indent}// {}", statement.group.heading()));
            if statement.group == AttrGroup::Hardware2 {
                out.push(format!("{INDENT}if (!`objExists \"{RENDER_GLOBALS_NODE}\"`)"));
                out.push(format!("{INDENT}{{"));
                out.push(format!("{INDENT}{INDENT}createNode \"{RENDER_GLOBALS_NODE}\";"));
                out.push(format!("{INDENT}}}"));
            }
            current = Some(statement.group);
        }

        let indent = if camera_open { "        " } else { INDENT };
        for line in &statement.lines {
            out.push(format!("{indent}{line}"));
        }
    }

    if camera_open {
        out.push(format!("{INDENT}}}"));
    }

    out.push("}".to_string());
    out.push(String::new());
    out.push(format!("{APPLY_PROC}();"));
    out.join("\n")
}

const PREAMBLE: &[&str] = &[
    "// Viewport Settings - Generated by viewportCapture",
    "global proc viewportCaptureApply()",
    "{",
    "    string $panel = `getPanel -withFocus`;",
    "    if (`getPanel -typeOf $panel` != \"modelPanel\")",
    "    {",
    "        string $modelPanels[] = `getPanel -type \"modelPanel\"`;",
    "        $panel = \"\";",
    "        if (size($modelPanels) > 0)",
    "        {",
    "            $panel = $modelPanels[0];",
    "        }",
    "        if ($panel == \"\")",
    "        {",
    "            error \"No valid modelPanel found.\\nPlease open a viewport first.\";",
    "            return;",
    "        }",
    "    }",
    "",
    "    // Set Viewport 2.0 renderer",
    "    modelEditor -e -rendererName \"vp2Renderer\" $panel;",
    "",
    "    string $camera = `modelEditor -q -camera $panel`;",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AttributeSpec;
    use crate::types::Domain;

    fn state(entries: Vec<(&str, AttrValue)>) -> CapturedState {
        CapturedState::from_entries(
            Some("modelPanel4".into()),
            entries.into_iter().map(|(id, v)| (id.to_string(), v)),
        )
    }

    #[test]
    fn test_empty_state_emits_placeholder() {
        let emission = emit(&CapturedState::default(), &Catalog::builtin());
        assert_eq!(emission.script(), EMPTY_SCRIPT);
        assert!(emission.statements.is_empty());
    }

    #[test]
    fn test_model_editor_statements() {
        let catalog = Catalog::builtin();
        let emission = emit(
            &state(vec![
                ("grid", AttrValue::Bool(false)),
                ("displayAppearance", AttrValue::Text("smoothShaded".into())),
            ]),
            &catalog,
        );
        let texts: Vec<String> = emission.statements.iter().map(Statement::text).collect();
        assert_eq!(
            texts,
            vec![
                "modelEditor -e -grid false $panel;",
                "modelEditor -e -displayAppearance \"smoothShaded\" $panel;",
            ]
        );
    }

    #[test]
    fn test_render_globals_use_numeric_bools_and_double3() {
        let catalog = Catalog::builtin();
        let emission = emit(
            &state(vec![
                ("ssaoEnable", AttrValue::Bool(true)),
                ("multiSampleCount", AttrValue::Int(8)),
                ("hwFogColor", AttrValue::Color([0.5, 0.5, 1.0])),
            ]),
            &catalog,
        );
        let texts: Vec<String> = emission.statements.iter().map(Statement::text).collect();
        assert_eq!(
            texts,
            vec![
                "setAttr \"hardwareRenderingGlobals.multiSampleCount\" 8;",
                "setAttr \"hardwareRenderingGlobals.ssaoEnable\" 1;",
                "setAttr \"hardwareRenderingGlobals.hwFogColor\" -type double3 0.5 0.5 1.0;",
            ]
        );
        assert!(emission.script().contains("createNode \"hardwareRenderingGlobals\";"));
    }

    #[test]
    fn test_camera_statements_are_wrapped() {
        let catalog = Catalog::builtin();
        let emission = emit(
            &state(vec![
                ("overscan", AttrValue::Float(1.3)),
                ("filmFit", AttrValue::Text("horizontal".into())),
                ("grid", AttrValue::Bool(true)),
            ]),
            &catalog,
        );
        let script = emission.script();
        let open = script.find("if ($camera != \"\")").unwrap();
        let overscan = script.find("camera -e -overscan 1.3 $camera;").unwrap();
        let film_fit = script.find("camera -e -filmFit \"horizontal\" $camera;").unwrap();
        let grid = script.find("modelEditor -e -grid true $panel;").unwrap();
        assert!(open < overscan && overscan < film_fit && film_fit < grid);
        assert!(script.contains("        // Camera Film Fit Settings"));
    }

    #[test]
    fn test_bottom_color_needs_gradient() {
        let catalog = Catalog::builtin();
        let without = emit(
            &state(vec![
                ("backgroundGradient", AttrValue::Bool(false)),
                ("backgroundBottomColor", AttrValue::Color([0.0, 0.0, 0.0])),
            ]),
            &catalog,
        );
        assert_eq!(without.statements.len(), 1);
        assert!(without.omitted.is_empty());

        let with = emit(
            &state(vec![
                ("backgroundGradient", AttrValue::Bool(true)),
                ("backgroundBottomColor", AttrValue::Color([0.0, 0.0, 0.0])),
            ]),
            &catalog,
        );
        assert_eq!(with.statements.len(), 2);
        assert_eq!(
            with.statements[1].text(),
            "displayRGBColor \"backgroundBottom\" 0.0 0.0 0.0;"
        );
    }

    #[test]
    fn test_gpu_cache_loads_plugin_only_when_enabled() {
        let catalog = Catalog::builtin();
        let on = emit(&state(vec![("gpuCache", AttrValue::Bool(true))]), &catalog);
        assert!(on.script().contains("loadPlugin \"gpuCache\";"));
        assert!(
            on.script()
                .contains("modelEditor -e -pluginObjects gpuCacheDisplayFilter true $panel;")
        );

        let off = emit(&state(vec![("gpuCache", AttrValue::Bool(false))]), &catalog);
        assert!(!off.script().contains("loadPlugin"));
        assert!(
            off.script()
                .contains("modelEditor -e -pluginObjects gpuCacheDisplayFilter false $panel;")
        );
    }

    #[test]
    fn test_unsupported_values_are_omitted() {
        let catalog = Catalog::builtin();
        let emission = emit(
            &state(vec![
                ("grid", AttrValue::Text("yes".into())),
                ("overscan", AttrValue::Float(f64::INFINITY)),
                ("displayLights", AttrValue::Text("all\"; quit -f; \"".into())),
                ("shadows", AttrValue::Bool(true)),
                ("notAnAttribute", AttrValue::Bool(true)),
            ]),
            &catalog,
        );
        assert_eq!(emission.statements.len(), 1);
        assert_eq!(emission.statements[0].id, "shadows");
        let omitted: Vec<&str> = emission.omitted.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            omitted,
            vec!["overscan", "grid", "displayLights", "notAnAttribute"]
        );
        assert!(!emission.script().contains("quit"));
    }

    #[test]
    fn test_floats_never_use_exponents() {
        let catalog = Catalog::builtin();
        let emission = emit(
            &state(vec![
                ("overscan", AttrValue::Float(1e16)),
                ("ssaoAmount", AttrValue::Float(1e-7)),
                ("ssaoRadius", AttrValue::Float(-0.0)),
                ("hwFogDensity", AttrValue::Float(0.1)),
            ]),
            &catalog,
        );
        let texts: Vec<String> = emission.statements.iter().map(Statement::text).collect();
        assert!(texts.contains(&"camera -e -overscan 10000000000000000.0 $camera;".to_string()));
        assert!(texts.contains(
            &"setAttr \"hardwareRenderingGlobals.ssaoAmount\" 0.0000001;".to_string()
        ));
        assert!(texts.contains(
            &"setAttr \"hardwareRenderingGlobals.ssaoRadius\" -0.0;".to_string()
        ));
        assert!(texts.contains(
            &"setAttr \"hardwareRenderingGlobals.hwFogDensity\" 0.1;".to_string()
        ));
    }

    #[test]
    fn test_non_finite_floats_are_omitted() {
        let catalog = Catalog::builtin();
        let emission = emit(
            &state(vec![
                ("overscan", AttrValue::Float(f64::NAN)),
                ("hwFogColor", AttrValue::Color([0.5, f64::INFINITY, 0.5])),
                ("grid", AttrValue::Bool(true)),
            ]),
            &catalog,
        );
        let omitted: Vec<&str> = emission.omitted.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(omitted, vec!["overscan", "hwFogColor"]);
        assert_eq!(emission.statements.len(), 1);
        assert!(!emission.script().contains("NaN"));
        assert!(!emission.script().contains("inf"));
    }

    #[test]
    fn test_fog_toggle_also_sets_render_globals() {
        let catalog = Catalog::builtin();
        let on = emit(&state(vec![("hwFog", AttrValue::Bool(true))]), &catalog);
        assert_eq!(
            on.statements[0].lines,
            vec![
                "modelEditor -e -hwFog true $panel;",
                "if (!`objExists \"hardwareRenderingGlobals\"`)",
                "{",
                "    createNode \"hardwareRenderingGlobals\";",
                "}",
                "setAttr \"hardwareRenderingGlobals.hwFogEnable\" 1;",
            ]
        );

        let off = emit(&state(vec![("hwFog", AttrValue::Bool(false))]), &catalog);
        assert!(off.script().contains("setAttr \"hardwareRenderingGlobals.hwFogEnable\" 0;"));
        assert_eq!(off.script().matches('{').count(), off.script().matches('}').count());
    }

    #[test]
    fn test_script_is_self_contained_proc() {
        let catalog = Catalog::builtin();
        let emission = emit(&state(vec![("grid", AttrValue::Bool(true))]), &catalog);
        let script = emission.script();
        assert!(script.starts_with("// Viewport Settings - Generated by viewportCapture"));
        assert!(script.contains("global proc viewportCaptureApply()"));
        assert!(script.ends_with("}\n\nviewportCaptureApply();"));
        assert_eq!(script.matches('{').count(), script.matches('}').count());
    }

    #[test]
    fn test_render_rejects_wrong_domain() {
        let spec = AttributeSpec::new(
            "shadows",
            AttrGroup::Display,
            Domain::Bool,
            Target::ModelEditor("shadows"),
        );
        let err = render(&spec, &AttrValue::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported value for 'shadows': expected bool, found int"
        );
    }
}
