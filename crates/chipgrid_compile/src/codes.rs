//! Diagnostic codes for compilation.
//!
//! Errors `E201`--`E205` stop code generation for the root being compiled.
//! Warnings `W201`--`W202` describe children that compile but probably do
//! not behave as intended.

use chipgrid_diagnostics::{Category, Diagnostic, DiagnosticCode, Location};
use chipgrid_ir::{ChipId, TypeName};

/// The chip source document is malformed.
pub const E201: DiagnosticCode = DiagnosticCode::new(Category::Error, 201);

/// A wired child refers to a type that is not defined.
pub const E202: DiagnosticCode = DiagnosticCode::new(Category::Error, 202);

/// Custom types contain each other.
pub const E203: DiagnosticCode = DiagnosticCode::new(Category::Error, 203);

/// The root chip's type cannot be compiled.
pub const E204: DiagnosticCode = DiagnosticCode::new(Category::Error, 204);

/// A code template failed to parse or render.
pub const E205: DiagnosticCode = DiagnosticCode::new(Category::Error, 205);

/// A child without wires was left out.
pub const W201: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);

/// Children feed their own inputs.
pub const W202: DiagnosticCode = DiagnosticCode::new(Category::Warning, 202);

/// Creates a warning for a child that no wire touches.
pub fn warning_dead_chip(owner: &TypeName, chip: &ChipId) -> Diagnostic {
    Diagnostic::warning(
        W201,
        format!("chip `{chip}` has no connections and was not compiled"),
        Location::item(owner.as_str(), chip.as_str()),
    )
    .with_help("wire it up or remove it")
}

/// Creates a warning for a combinational loop between children.
pub fn warning_feedback_loop(owner: &TypeName, chips: &[ChipId]) -> Diagnostic {
    let names: Vec<&str> = chips.iter().map(ChipId::as_str).collect();
    Diagnostic::warning(
        W202,
        format!("chips {} feed back into each other", names.join(", ")),
        Location::chip_type(owner.as_str()),
    )
    .with_note("values along the loop lag by one evaluation")
}
