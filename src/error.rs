//! Error types for the pressure-drop analysis pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PressdropError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PressdropError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Evaluation error: {0}")]
    EvaluationError(String),

    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    #[error("Scaler not fitted")]
    ScalerNotFitted,
}

impl From<polars::error::PolarsError> for PressdropError {
    fn from(err: polars::error::PolarsError) -> Self {
        PressdropError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PressdropError {
    fn from(err: serde_json::Error) -> Self {
        PressdropError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PressdropError {
    fn from(err: ndarray::ShapeError) -> Self {
        PressdropError::ShapeError {
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
        let err = PressdropError::DataError("bad cell".to_string());
        assert_eq!(err.to_string(), "Data error: bad cell");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PressdropError = io_err.into();
        assert!(matches!(err, PressdropError::IoError(_)));
    }
}
