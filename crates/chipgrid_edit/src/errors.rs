//! Problems in a content graph and their diagnostic codes.
//!
//! Codes `E101`--`E103` cover graph problems: wires whose route failed,
//! children that do not fit their container, and problems inside nested
//! custom children.

use chipgrid_common::Vec2;
use chipgrid_diagnostics::{Category, Diagnostic, DiagnosticCode, Location};
use chipgrid_ir::{ChipContent, ChipId, ConnectionId, TypeLookup, TypeName};

/// A wire could not be routed.
pub const E101: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);

/// A custom child is not strictly smaller than its container.
pub const E102: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);

/// A custom child has problems in its own content.
pub const E103: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);

/// One problem found in a content graph. Editing can continue regardless.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// The wire has no valid route.
    #[error("Invalid Connection {0}")]
    InvalidConnection(ConnectionId),

    /// A custom child's area reaches the container's area.
    #[error("Chip Too Large {0}")]
    ChipTooLarge(ChipId),

    /// A problem inside the content of a custom child.
    #[error("{error} (inside {chip})")]
    Nested {
        /// The child chip.
        chip: ChipId,
        /// The child's type.
        chip_type: TypeName,
        /// What is wrong inside it.
        error: Box<ContentError>,
    },
}

impl ContentError {
    /// The innermost problem, past any nesting.
    pub fn root_cause(&self) -> &ContentError {
        match self {
            ContentError::Nested { error, .. } => error.root_cause(),
            other => other,
        }
    }

    /// Converts the problem into a diagnostic located in `owner`.
    pub fn to_diagnostic(&self, owner: &TypeName) -> Diagnostic {
        match self {
            ContentError::InvalidConnection(id) => error_invalid_connection(owner, id),
            ContentError::ChipTooLarge(chip) => error_chip_too_large(owner, chip),
            ContentError::Nested { chip, chip_type, error } => error_nested(owner, chip, chip_type, error),
        }
    }
}

/// Creates a diagnostic for a wire without a route.
pub fn error_invalid_connection(owner: &TypeName, id: &ConnectionId) -> Diagnostic {
    Diagnostic::error(E101, format!("no route for connection `{id}`"), Location::item(owner.as_str(), id.to_string()))
        .with_help("move the chips apart or clear the obstruction, then reroute")
}

/// Creates a diagnostic for a custom child that does not fit.
pub fn error_chip_too_large(owner: &TypeName, chip: &ChipId) -> Diagnostic {
    Diagnostic::error(
        E102,
        format!("chip `{chip}` is not smaller than `{owner}`"),
        Location::item(owner.as_str(), chip.as_str()),
    )
    .with_note("a custom chip must have a smaller area than the chip that contains it")
}

/// Creates a diagnostic for a problem inside a custom child.
pub fn error_nested(owner: &TypeName, chip: &ChipId, chip_type: &TypeName, error: &ContentError) -> Diagnostic {
    Diagnostic::error(
        E103,
        format!("chip `{chip}` of type `{chip_type}` has errors"),
        Location::item(owner.as_str(), chip.as_str()),
    )
    .with_note(error.to_string())
    .with_help(format!("open `{chip_type}` to fix it"))
}

/// Every problem in `content`, a graph for a type of `size`.
///
/// Custom children smaller than the container on both axes are checked
/// recursively. Sizes shrink at every level, so cyclic type graphs still
/// terminate.
pub fn content_errors(content: &ChipContent, size: Vec2, types: &dyn TypeLookup) -> Vec<ContentError> {
    let mut errors: Vec<ContentError> = content
        .connections
        .iter()
        .filter(|c| !c.valid_path)
        .map(|c| ContentError::InvalidConnection(c.id()))
        .collect();

    let custom = content.chips.values().filter(|c| !types.is_standard(&c.type_name));
    for chip in custom.clone() {
        if chip.size(types).area() >= size.area() {
            errors.push(ContentError::ChipTooLarge(chip.id.clone()));
        }
    }

    for chip in custom {
        let data = types.type_data(&chip.type_name);
        if data.size.x < size.x && data.size.y < size.y {
            for error in content_errors(&data.content, data.size, types) {
                errors.push(ContentError::Nested {
                    chip: chip.id.clone(),
                    chip_type: chip.type_name.clone(),
                    error: Box::new(error),
                });
            }
        }
    }
    errors
}
