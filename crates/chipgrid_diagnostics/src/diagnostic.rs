//! The diagnostic message itself.

use crate::code::DiagnosticCode;
use crate::location::Location;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A problem found in a design, with optional notes and help text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How serious it is.
    pub severity: Severity,
    /// Stable code, e.g. `E101`.
    pub code: DiagnosticCode,
    /// One-line description.
    pub message: String,
    /// Where it was found.
    pub location: Location,
    /// Extra context lines.
    pub notes: Vec<String>,
    /// Suggestions for fixing it.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: String, location: Location) -> Self {
        Self {
            severity,
            code,
            message,
            location,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// An error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Error, code, message.into(), location)
    }

    /// A warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Warning, code, message.into(), location)
    }

    /// Appends a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Appends a help line.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn builder() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 102),
            "Chip Too Large adder_1",
            Location::item("adder", "adder_1"),
        )
        .with_note("chip area 16 is not smaller than the container area 16")
        .with_help("shrink the chip type");

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.to_string(), "E102");
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn warning_severity() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 201), "dead", Location::NONE);
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.notes.is_empty());
    }
}
