//! Shared foundational types used across the chipgrid workspace.
//!
//! This crate provides the grid geometry kernel ([`Vec2`], [`Rect`], [`Line`]),
//! the single quarter-turn [`Rotation`] transform used by every component that
//! places pins, content hashing for change detection, and the internal error type.

#![warn(missing_docs)]

pub mod geom;
pub mod hash;
pub mod result;
pub mod rotation;

pub use geom::{Line, Rect, Vec2, MAX_TYPE_SIZE};
pub use hash::ContentHash;
pub use result::{ChipResult, InternalError};
pub use rotation::Rotation;
