//! Error types for the sensor_forecast crate

use crate::target::Target;
use chrono::{DateTime, Utc};
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sensor_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The time series store could not be opened or queried
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Fewer recent values than the lag window needs
    #[error("Insufficient history for {target}: need {required} values, have {available}")]
    InsufficientHistory {
        target: Target,
        required: usize,
        available: usize,
    },

    /// No valid training rows to fit a model on
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Feature names presented to a model differ from its fit-time schema
    #[error("Feature mismatch: expected {expected:?}, found {found:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Two readings share a timestamp
    #[error("Duplicate timestamp in series: {0}")]
    DuplicateTimestamp(DateTime<Utc>),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A persisted model could not be found or is inconsistent
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A pipeline finished without any target succeeding
    #[error("No target succeeded: {0}")]
    NoTargetSucceeded(String),

    /// Error from regression math
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
