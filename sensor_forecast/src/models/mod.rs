//! Forecasting models over lag feature vectors

use crate::error::Result;
use crate::features::{FeatureVector, TrainingRow};
use std::fmt::Debug;

/// Fitted forecast model
pub trait FittedForecastModel: Debug {
    /// Predict the next value from a feature vector, binding features by name
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Feature names seen at fit time, in coefficient order
    fn feature_names(&self) -> &[String];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted on training rows
pub trait ForecastModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedForecastModel;

    /// Fit the model on training rows
    fn fit(&self, rows: &[TrainingRow]) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod ridge;

pub use ridge::{FittedRidgeForecast, RidgeForecast};
