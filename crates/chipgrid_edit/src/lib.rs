//! Editing the content graph of a custom chip type.
//!
//! A [`ContentEditor`] is a working copy of one type's [`ChipContent`]. It
//! enforces the placement and wiring rules, keeps wire routes current after
//! each edit, and reports what is wrong with the graph. Nothing reaches the
//! registry until [`ContentEditor::commit`] hands the copy back.
//!
//! [`ChipContent`]: chipgrid_ir::ChipContent

#![warn(missing_docs)]

pub mod editor;
pub mod errors;

pub use editor::ContentEditor;
pub use errors::{content_errors, ContentError};
