//! Conformance test helpers for chipgrid.
//!
//! Builds registries, content graphs, and chip sources the way a design
//! session would, and runs them through the compiler, returning structured
//! results for assertion in integration tests.

#![warn(missing_docs)]

use chipgrid_common::Vec2;
use chipgrid_compile::{CompileError, CompileSettings, CompiledProgram, Compiler, Templates};
use chipgrid_config::ChipgridConfig;
use chipgrid_diagnostics::{Diagnostic, DiagnosticSink};
use chipgrid_edit::ContentEditor;
use chipgrid_ir::{Chip, ChipSource, ChipTypeData, Connection, Pin, TypeName};
use chipgrid_registry::TypeRegistry;

/// The AND3 chip source: three inputs ANDed by two gates in series.
pub const AND3_SOURCE_JSON: &str = include_str!("../fixtures/and3.json");

/// Result of compiling one chip source.
pub struct CompileResult {
    /// The program, or why there is none.
    pub program: Result<CompiledProgram, CompileError>,
    /// Warnings emitted along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl CompileResult {
    /// Codes of the emitted diagnostics, in emission order.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Parses a configuration from TOML text.
pub fn make_config(toml: &str) -> ChipgridConfig {
    chipgrid_config::load_config_from_str(toml).unwrap()
}

/// An in-memory registry whose base type exists with the given size.
pub fn registry_with_base(size: Vec2) -> TypeRegistry {
    let config = ChipgridConfig::default();
    let mut registry = TypeRegistry::in_memory(&config).unwrap();
    let base = registry.base_type().clone();
    registry.new_type(base.clone()).unwrap();
    registry.set_size(&base, size).unwrap();
    registry
}

/// A custom type definition with the given size and ports.
pub fn custom_type(size: Vec2, inputs: &[&str], outputs: &[&str]) -> ChipTypeData {
    let mut data = ChipTypeData::skeleton();
    data.size = size;
    data.inputs = inputs.iter().map(|s| s.to_string()).collect();
    data.outputs = outputs.iter().map(|s| s.to_string()).collect();
    data.sanitized()
}

/// Registers `name` and opens an editor on it.
pub fn open_type(registry: &mut TypeRegistry, name: &str, size: Vec2) -> ContentEditor {
    let name = registry.new_type(name).unwrap().unwrap();
    registry.set_size(&name, size).unwrap();
    ContentEditor::open(registry, &name)
}

/// The AND3 definition from [`AND3_SOURCE_JSON`].
pub fn and3_type() -> ChipTypeData {
    let source = ChipSource::from_json(AND3_SOURCE_JSON).unwrap();
    source.chip_data[&TypeName::new("and3")].clone()
}

/// A type whose buffer children are chained: input A feeds `ids[0]`, each
/// child feeds the next, and the last drives output R.
pub fn chain_type(owner: &str, ids: &[&str]) -> ChipTypeData {
    let mut data = custom_type(Vec2::new(3, 3), &["A"], &["R"]);
    for (i, id) in ids.iter().enumerate() {
        let pos = Vec2::new(2 + 3 * i as i32, 4);
        data.content.chips.insert((*id).into(), Chip::new(*id, "buffer", pos));
    }
    let mut source = Pin::input(owner, "A");
    for &id in ids {
        data.content
            .connections
            .push(Connection::new(source, Pin::input(id, "A"), 0));
        source = Pin::output(id, "R");
    }
    data.content
        .connections
        .push(Connection::new(source, Pin::output(owner, "R"), 0));
    data
}

/// A chip source with an instance of `root` at the top.
pub fn source_of(root: &str, types: Vec<(&str, ChipTypeData)>) -> ChipSource {
    ChipSource {
        chip: Chip::new(root, root, Vec2::ONE),
        chip_data: types.into_iter().map(|(name, data)| (TypeName::new(name), data)).collect(),
    }
}

/// Compiles with default settings and built-in templates.
pub fn compile(source: &ChipSource) -> CompileResult {
    let compiler = Compiler::new(CompileSettings::default(), Templates::builtin()).unwrap();
    let sink = DiagnosticSink::new();
    let program = compiler.compile(source, &sink);
    let warning_count = sink.warning_count();
    CompileResult {
        program,
        diagnostics: sink.take_all(),
        warning_count,
    }
}
