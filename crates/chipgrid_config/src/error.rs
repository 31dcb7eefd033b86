//! Errors from reading `chipgrid.toml`.

/// Failure to read, parse, or validate a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML is malformed or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A value is out of range.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = ConfigError::ValidationError("routing.pin_cost must be below routing.max_cost".into());
        assert_eq!(
            err.to_string(),
            "validation error: routing.pin_cost must be below routing.max_cost"
        );
        let err = ConfigError::ParseError("expected `=`".into());
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }
}
