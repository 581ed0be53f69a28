//! # Forecast Math
//!
//! Numeric building blocks for the sensor forecasting workspace.
//! This crate provides a ridge (L2-regularized) linear regression solver
//! and the fit-quality metrics reported after training.

use thiserror::Error;

pub mod metrics;
pub mod ridge;

pub use metrics::{fit_metrics, FitMetrics};
pub use ridge::{RidgeFit, RidgeRegression};

/// Errors that can occur in regression calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for regression math operations
pub type Result<T> = std::result::Result<T, MathError>;
