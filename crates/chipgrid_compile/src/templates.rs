//! The templates that assemble program text.
//!
//! Two templates are involved: `chip` turns the emitted blocks of one
//! custom type into a class, and `program` wraps every class into a single
//! expression that evaluates to an instance of the root type. Both ship with
//! the crate and can be replaced by files named `chip.jinja` and
//! `program.jinja` in a directory of the user's choice.
//!
//! Standard chip `code` strings are templates too, rendered once per
//! instance with that instance's variable names.

use crate::emit::ChipContext;
use crate::error::CompileError;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Built-in template for one custom type.
pub const CHIP_TEMPLATE: &str = include_str!("../templates/chip.jinja");

/// Built-in template for the whole program.
pub const PROGRAM_TEMPLATE: &str = include_str!("../templates/program.jinja");

const CHIP_NAME: &str = "chip.jinja";
const PROGRAM_NAME: &str = "program.jinja";

/// Values handed to the program template.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramContext {
    /// Root type name.
    pub chip_type: String,
    /// Class of the root type.
    pub chip_name: String,
    /// Root constant literals, in constant name order.
    pub constants: Vec<String>,
    /// Rendered classes, dependencies first.
    pub blocks: Vec<String>,
    /// Whether to emit explanatory comments.
    pub debug: bool,
}

/// The chip and program templates plus the engine that renders them.
pub struct Templates {
    env: Environment<'static>,
    chip: String,
    program: String,
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("chip", &self.chip.len())
            .field("program", &self.program.len())
            .finish()
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

fn read_override(dir: &Path, name: &str, fallback: &str) -> Result<String, CompileError> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(fallback.to_string()),
        Err(source) => Err(CompileError::TemplateIo { path, source }),
    }
}

impl Templates {
    /// The templates bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_sources(CHIP_TEMPLATE, PROGRAM_TEMPLATE)
    }

    /// Templates from explicit sources.
    pub fn from_sources(chip: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            env: environment(),
            chip: chip.into(),
            program: program.into(),
        }
    }

    /// Reads `chip.jinja` and `program.jinja` from `dir`. A missing file
    /// keeps the built-in template.
    pub fn load(dir: &Path) -> Result<Self, CompileError> {
        let chip = read_override(dir, CHIP_NAME, CHIP_TEMPLATE)?;
        let program = read_override(dir, PROGRAM_NAME, PROGRAM_TEMPLATE)?;
        Ok(Self::from_sources(chip, program))
    }

    /// Renders the class of one custom type.
    pub fn render_chip(&self, ctx: &ChipContext) -> Result<String, CompileError> {
        Ok(self.env.render_named_str(CHIP_NAME, &self.chip, ctx)?)
    }

    /// Renders the whole program.
    pub fn render_program(&self, ctx: &ProgramContext) -> Result<String, CompileError> {
        Ok(self.env.render_named_str(PROGRAM_NAME, &self.program, ctx)?)
    }

    /// Renders the inline code of a standard type for one instance.
    pub fn render_code(
        &self,
        chip_type: &str,
        code: &str,
        vars: &BTreeMap<String, String>,
    ) -> Result<String, CompileError> {
        Ok(self.env.render_named_str(chip_type, code, vars)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn code_is_not_escaped() {
        let t = Templates::builtin();
        let out = t
            .render_code(
                "and",
                "{{ output_R }} = !!({{ input_A }} && {{ input_B }});",
                &vars(&[("output_R", "O_g_R"), ("input_A", "I_g_A"), ("input_B", "I_g_B")]),
            )
            .unwrap();
        assert_eq!(out, "O_g_R = !!(I_g_A && I_g_B);");
    }

    #[test]
    fn unknown_variables_fail_with_the_type_name() {
        let t = Templates::builtin();
        let err = t.render_code("broken", "{{ input_Q }}", &vars(&[])).unwrap_err();
        match err {
            CompileError::Template { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn syntax_errors_are_template_errors() {
        let t = Templates::builtin();
        let err = t.render_code("broken", "{% if %}", &vars(&[])).unwrap_err();
        assert!(matches!(err, CompileError::Template { .. }));
    }

    #[test]
    fn program_wraps_blocks() {
        let t = Templates::builtin();
        let out = t
            .render_program(&ProgramContext {
                chip_type: "top".into(),
                chip_name: "topChip".into(),
                constants: vec!["1".into(), "\"x\"".into()],
                blocks: vec!["const topChip = 1;".into()],
                debug: false,
            })
            .unwrap();
        assert!(out.starts_with("(function () {"));
        assert!(out.contains("  const topChip = 1;"));
        assert!(out.contains("return new topChip(1, \"x\");"));
        assert!(out.ends_with("})()"));
    }

    #[test]
    fn overrides_replace_only_present_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROGRAM_NAME), "{{ chip_name }}!").unwrap();
        let t = Templates::load(dir.path()).unwrap();
        assert_eq!(t.chip, CHIP_TEMPLATE);
        let out = t
            .render_program(&ProgramContext {
                chip_type: "top".into(),
                chip_name: "topChip".into(),
                constants: Vec::new(),
                blocks: Vec::new(),
                debug: false,
            })
            .unwrap();
        assert_eq!(out, "topChip!");
    }

    #[test]
    fn missing_override_dir_keeps_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let t = Templates::load(&dir.path().join("absent")).unwrap();
        assert_eq!(t.program, PROGRAM_TEMPLATE);
    }
}
