//! The catalogue of chip types.
//!
//! A [`TypeRegistry`] holds the bundled standard chips and every custom type
//! the user has defined. Standard types are read-only; every change to a
//! custom type is re-sanitized and written through a [`TypeStore`] right away,
//! one record per type, so separate sessions can edit different types side by
//! side and pick up each other's changes with
//! [`TypeRegistry::sync_external`].

#![warn(missing_docs)]

pub mod error;
pub mod registry;
pub mod store;

pub use error::{RegistryError, StoreError};
pub use registry::TypeRegistry;
pub use store::{DirStore, MemoryStore, TypeStore};
