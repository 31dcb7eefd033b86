//! Error types for the type registry and its stores.

use chipgrid_common::InternalError;
use std::path::PathBuf;

/// Errors raised while reading or writing stored chip types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred on a type file or the store directory.
    #[error("type store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A stored record is not a valid chip type.
    #[error("failed to parse stored type {path}: {reason}")]
    Parse {
        /// The record that failed to parse.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A chip type could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

/// Errors raised by [`TypeRegistry`](crate::TypeRegistry) operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Persisting or loading a type failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The bundled standard library is broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
