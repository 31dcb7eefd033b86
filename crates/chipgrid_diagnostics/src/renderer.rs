//! Turning diagnostics into text.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Formats one diagnostic for display.
pub trait DiagnosticRenderer {
    /// Renders `diag`, including a trailing newline.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Compiler-style terminal output:
///
/// ```text
/// error[E101]: Invalid Connection and_1.out.R>not_1.in.A
///   --> half_adder::and_1.out.R>not_1.in.A
///    = help: move the chips apart or reroute the connection by hand
/// ```
pub struct TerminalRenderer {
    /// Use ANSI colors for the severity label.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let ansi = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{ansi}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let header = format!("{}[{}]", diag.severity, diag.code);
        let mut out = format!("{}: {}\n", self.paint(diag.severity, &header), diag.message);
        if !diag.location.is_none() {
            out.push_str(&format!("  --> {}\n", diag.location));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

/// One compact JSON object per line, for tools that consume diagnostics.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = serde_json::to_string(diag).unwrap_or_else(|_| "{}".to_string());
        out.push('\n');
        out
    }
}
