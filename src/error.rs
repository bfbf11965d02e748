//! Error types for anacomus

use thiserror::Error;

/// Result type alias for anacomus operations
pub type Result<T> = std::result::Result<T, AnacomusError>;

/// Main error type for the analysis library
#[derive(Error, Debug)]
pub enum AnacomusError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Plot error: {0}")]
    PlotError(String),
}

impl From<polars::error::PolarsError> for AnacomusError {
    fn from(err: polars::error::PolarsError) -> Self {
        AnacomusError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for AnacomusError {
    fn from(err: serde_json::Error) -> Self {
        AnacomusError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for AnacomusError {
    fn from(err: ndarray::ShapeError) -> Self {
        AnacomusError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnacomusError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AnacomusError = io_err.into();
        assert!(matches!(err, AnacomusError::IoError(_)));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = AnacomusError::InvalidParameter {
            name: "contamination".to_string(),
            value: "0.7".to_string(),
            reason: "must be in (0, 0.5]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter: contamination = 0.7, must be in (0, 0.5]"
        );
    }
}
