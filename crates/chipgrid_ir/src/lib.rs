//! Data model for chip designs.
//!
//! A [`ChipTypeData`] describes a kind of chip: its ports, size, constant
//! slots, and either inline `code` (standard chips) or a [`ChipContent`]
//! graph of child [`Chip`] instances joined by [`Connection`]s (custom chips).
//! Everything here is plain data with serde support; editing rules live in
//! `chipgrid_edit` and `chipgrid_registry`.

#![warn(missing_docs)]

pub mod chip;
pub mod connection;
pub mod const_value;
pub mod content;
pub mod ids;
pub mod library;
pub mod lookup;
pub mod pin;
pub mod source;
pub mod type_data;

pub use chip::Chip;
pub use connection::{Connection, ConnectionId};
pub use const_value::ConstValue;
pub use content::ChipContent;
pub use ids::{ChipId, TypeName};
pub use library::{standard_library, STANDARD_LIBRARY_JSON};
pub use lookup::TypeLookup;
pub use pin::{Pin, PinParseError};
pub use source::{ChipSource, SourceError};
pub use type_data::ChipTypeData;
