//! Internal error type shared by the chipgrid crates.

/// Result of an operation that can only fail because of a chipgrid bug.
///
/// Problems in user designs are reported as diagnostics and never surface
/// through this type.
pub type ChipResult<T> = Result<T, InternalError>;

/// A broken invariant inside chipgrid itself.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Creates an internal error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
