//! Error types for Filedrop.

use thiserror::Error;

/// Common error type for Filedrop.
#[derive(Error, Debug)]
pub enum FiledropError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Filedrop operations.
pub type Result<T> = std::result::Result<T, FiledropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = FiledropError::NotFound("File: a.txt".to_string());
        assert_eq!(err.to_string(), "File: a.txt not found");
    }

    #[test]
    fn test_validation_error_display() {
        let err = FiledropError::Validation("filename contains '/'".to_string());
        assert_eq!(err.to_string(), "validation error: filename contains '/'");
    }

    #[test]
    fn test_config_error_display() {
        let err = FiledropError::Config("port is not set".to_string());
        assert_eq!(err.to_string(), "configuration error: port is not set");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: FiledropError = io_err.into();
        assert!(matches!(err, FiledropError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
