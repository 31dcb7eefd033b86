//! Errors that stop compilation of a root chip.

use crate::codes::{E201, E202, E203, E204, E205};
use chipgrid_common::InternalError;
use chipgrid_diagnostics::{Diagnostic, Location};
use chipgrid_ir::{ChipId, SourceError, TypeName};
use std::path::PathBuf;

/// Why a chip source could not be compiled.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The source document failed its structural check.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A wired child refers to a type that is neither standard nor defined.
    #[error("unknown chip type `{chip_type}` used by `{chip}` in `{owner}`")]
    UnknownType {
        /// The missing type.
        chip_type: TypeName,
        /// The type whose content holds the child.
        owner: TypeName,
        /// The child.
        chip: ChipId,
    },

    /// Custom types that end up containing themselves.
    #[error("chip types contain each other: {}", join(cycle))]
    DependencyCycle {
        /// Types on the cycle, in name order.
        cycle: Vec<TypeName>,
    },

    /// The root chip's type has no content to compile.
    #[error("cannot compile `{root}`: {reason}")]
    RootNotCompilable {
        /// The root chip's type.
        root: TypeName,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A template failed to parse or render.
    #[error("template `{name}` failed: {message}")]
    Template {
        /// Template name, or the chip type whose inline code failed.
        name: String,
        /// The engine's message.
        message: String,
    },

    /// A template override directory could not be read.
    #[error("failed to read template {path}: {source}")]
    TemplateIo {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A bug in chipgrid.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

fn join(types: &[TypeName]) -> String {
    types.iter().map(TypeName::as_str).collect::<Vec<_>>().join(" -> ")
}

impl CompileError {
    /// Converts the error into a diagnostic, `None` for internal failures.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        let diag = match self {
            CompileError::Source(e) => Diagnostic::error(E201, e.to_string(), Location::NONE)
                .with_help("a chip source is `{ \"chip\": {...}, \"chipData\": {...} }`"),
            CompileError::UnknownType { chip_type, owner, chip } => Diagnostic::error(
                E202,
                format!("unknown chip type `{chip_type}`"),
                Location::item(owner.as_str(), chip.as_str()),
            )
            .with_help(format!("define `{chip_type}` or remove `{chip}`")),
            CompileError::DependencyCycle { cycle } => {
                let first = cycle.first().map(TypeName::as_str).unwrap_or_default();
                Diagnostic::error(E203, self.to_string(), Location::chip_type(first))
                    .with_note("a chip type cannot contain itself, directly or through other types")
            }
            CompileError::RootNotCompilable { root, reason } => {
                Diagnostic::error(E204, self.to_string(), Location::chip_type(root.as_str()))
                    .with_note(*reason)
            }
            CompileError::Template { name, message } => {
                Diagnostic::error(E205, format!("template `{name}` failed"), Location::NONE).with_note(message.clone())
            }
            CompileError::TemplateIo { path, .. } => {
                Diagnostic::error(E205, self.to_string(), Location::NONE)
                    .with_help(format!("check that {} is readable", path.display()))
            }
            CompileError::Internal(_) => return None,
        };
        Some(diag)
    }
}

impl From<minijinja::Error> for CompileError {
    fn from(e: minijinja::Error) -> Self {
        let name = e.name().unwrap_or("<string>").to_string();
        let message = match e.line() {
            Some(line) => format!("line {line}: {e}"),
            None => e.to_string(),
        };
        CompileError::Template { name, message }
    }
}
