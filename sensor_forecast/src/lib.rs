//! # Sensor Forecast
//!
//! Next-value forecasting for power draw, temperature and humidity sensor series.
//!
//! ## Features
//!
//! - Lag feature construction shared by training and prediction (`{target}_lag_{k}`)
//! - One ridge regression model per target, bound to its features by name
//! - JSON model artifacts that carry their feature schema
//! - Training and prediction pipelines that isolate per-target failures
//! - `train` and `predict` binaries for scheduled batch runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensor_forecast::{ForecastConfig, PredictionPipeline, TrainingPipeline};
//!
//! let config = ForecastConfig::from_env()?;
//!
//! // Fit and save a model per target from the full history
//! let trained = TrainingPipeline::new(config.clone())?.run_from_config()?;
//! println!("trained {} targets", trained.trained_count());
//!
//! // Forecast the next value of each target from its latest readings
//! let forecast = PredictionPipeline::new(config)?.run_from_config()?;
//! println!("{}", forecast.to_json()?);
//! # Ok::<(), sensor_forecast::ForecastError>(())
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod target;

// Re-export commonly used types
pub use crate::artifact::{ArtifactStore, FileArtifactStore};
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, Observation, Reading};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureVector, LagFeatureBuilder, TrainingRow};
pub use crate::models::{FittedForecastModel, FittedRidgeForecast, ForecastModel, RidgeForecast};
pub use crate::pipeline::{
    PredictionPipeline, PredictionReport, TargetOutcome, TrainingPipeline, TrainingReport,
};
pub use crate::store::{CsvStore, MemoryStore, TimeSeriesStore};
pub use crate::target::Target;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
