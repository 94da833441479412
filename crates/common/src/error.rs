//! Error types for wputils.

use thiserror::Error;

/// Result type used across wputils.
pub type WpResult<T> = Result<T, WpError>;

/// Error type used across wputils.
///
/// The transformation functions themselves never fail; they express every
/// failure through their return value. This type covers the surrounding
/// plumbing: loading settings, reading input, and validating CLI arguments.
#[derive(Debug, Error)]
pub enum WpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WpError {
    /// Returns a short machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit code the CLI uses for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::Config(_) => 78,
            Self::Io(_) => 74,
            Self::Internal(_) => 70,
        }
    }
}

// === From implementations ===

impl From<config::ConfigError> for WpError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for WpError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for WpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(WpError::Config("x".into()).error_code(), "CONFIG_ERROR");
        assert_eq!(
            WpError::InvalidArgument("x".into()).error_code(),
            "INVALID_ARGUMENT"
        );
    }

    #[test]
    fn test_display_includes_message() {
        let err = WpError::InvalidArgument("width must be a number".into());
        assert_eq!(err.to_string(), "Invalid argument: width must be a number");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: WpError = io.into();
        assert!(matches!(err, WpError::Io(_)));
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn test_from_anyhow_keeps_context() {
        let err: WpError = anyhow::anyhow!("root cause").context("encoding").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.to_string(), "Internal error: encoding: root cause");
    }
}
