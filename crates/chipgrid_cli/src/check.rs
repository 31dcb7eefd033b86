//! `chipgrid check`: report problems in a content graph.

use chipgrid_diagnostics::DiagnosticSink;
use chipgrid_edit::ContentEditor;

use crate::session::{report, status, CliError, Session};
use crate::{GlobalArgs, ReportFormat};

/// Prints the problems of one type. Returns 1 if there are any.
pub fn run(name: &str, global: &GlobalArgs) -> Result<i32, CliError> {
    let session = Session::open(global)?;
    let owner = session.custom_type(name)?;
    status(global, "Checking", format!("`{owner}`"));

    let editor = ContentEditor::open(&session.registry, &owner);
    let sink = DiagnosticSink::new();
    editor.report(&session.registry, &sink);

    let diagnostics = sink.take_all();
    report(global, &diagnostics);
    if !global.quiet && global.format == ReportFormat::Text {
        eprintln!("   Result: {} error(s)", diagnostics.len());
    }
    Ok(if diagnostics.is_empty() { 0 } else { 1 })
}
