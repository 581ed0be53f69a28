//! Ridge regression over named lag features

use crate::error::{ForecastError, Result};
use crate::features::{lag_feature_name, FeatureVector, TrainingRow};
use crate::models::{FittedForecastModel, ForecastModel};
use crate::target::Target;
use chrono::{DateTime, Utc};
use forecast_math::{fit_metrics, FitMetrics, RidgeFit, RidgeRegression};
use serde::{Deserialize, Serialize};

/// Default L2 regularization strength
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Ridge regression model for one target
#[derive(Debug, Clone)]
pub struct RidgeForecast {
    /// Name of the model
    name: String,
    target: Target,
    regression: RidgeRegression,
}

/// Fitted ridge model; immutable once created
///
/// Coefficients are stored alongside the feature names they were fitted
/// against, so a vector with different names is rejected instead of being
/// multiplied positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedRidgeForecast {
    name: String,
    target: Target,
    alpha: f64,
    feature_names: Vec<String>,
    fit: RidgeFit,
    training_rows: usize,
    metrics: FitMetrics,
    trained_at: DateTime<Utc>,
}

impl RidgeForecast {
    /// Create a new ridge model for `target`
    pub fn new(target: Target, alpha: f64) -> Result<Self> {
        let regression = RidgeRegression::new(alpha)?;

        Ok(Self {
            name: format!("Ridge Regression (target={}, alpha={})", target, alpha),
            target,
            regression,
        })
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn alpha(&self) -> f64 {
        self.regression.alpha()
    }
}

impl ForecastModel for RidgeForecast {
    type Fitted = FittedRidgeForecast;

    fn fit(&self, rows: &[TrainingRow]) -> Result<Self::Fitted> {
        let first = rows.first().ok_or_else(|| {
            ForecastError::InsufficientData(format!(
                "{} needs at least 1 training row",
                self.target
            ))
        })?;

        // Column order is the first row's order; every row is read by name.
        let feature_names = first.features.names();
        let mut x = Vec::with_capacity(rows.len());
        let mut y = Vec::with_capacity(rows.len());
        for row in rows {
            x.push(values_by_name(&feature_names, &row.features)?);
            y.push(row.label);
        }

        let fit = self.regression.fit(&x, &y)?;

        let predicted = x
            .iter()
            .map(|sample| fit.predict(sample))
            .collect::<forecast_math::Result<Vec<f64>>>()?;
        let metrics = fit_metrics(&predicted, &y)?;

        Ok(FittedRidgeForecast {
            name: self.name.clone(),
            target: self.target,
            alpha: self.regression.alpha(),
            feature_names,
            fit,
            training_rows: rows.len(),
            metrics,
            trained_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedRidgeForecast {
    pub fn target(&self) -> Target {
        self.target
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of lags the model was fitted with
    pub fn lag_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Coefficients paired with their feature names
    pub fn coefficients(&self) -> Vec<(&str, f64)> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .zip(self.fit.coefficients.iter().copied())
            .collect()
    }

    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    /// In-sample fit quality
    pub fn metrics(&self) -> &FitMetrics {
        &self.metrics
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Predict every row's features
    pub fn predict_rows(&self, rows: &[TrainingRow]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(&row.features)).collect()
    }

    /// Check that names, coefficients and target agree with the lag naming scheme
    pub fn validate_schema(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(ForecastError::ArtifactError(format!(
                "{} model has no features",
                self.target
            )));
        }

        if self.feature_names.len() != self.fit.coefficients.len() {
            return Err(ForecastError::ArtifactError(format!(
                "{} model has {} feature names but {} coefficients",
                self.target,
                self.feature_names.len(),
                self.fit.coefficients.len()
            )));
        }

        let canonical: Vec<String> = (1..=self.feature_names.len())
            .map(|k| lag_feature_name(self.target, k))
            .collect();
        if self.feature_names != canonical {
            return Err(ForecastError::ArtifactError(format!(
                "{} model features {:?} don't follow {:?}",
                self.target, self.feature_names, canonical
            )));
        }

        if !self.fit.intercept.is_finite() || self.fit.coefficients.iter().any(|w| !w.is_finite())
        {
            return Err(ForecastError::ArtifactError(format!(
                "{} model has non-finite parameters",
                self.target
            )));
        }

        Ok(())
    }
}

impl FittedForecastModel for FittedRidgeForecast {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let values = values_by_name(&self.feature_names, features)?;
        Ok(self.fit.predict(&values)?)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Read `features` in `names` order; the name sets must match exactly
fn values_by_name(names: &[String], features: &FeatureVector) -> Result<Vec<f64>> {
    let mismatch = || ForecastError::FeatureMismatch {
        expected: names.to_vec(),
        found: features.names(),
    };

    if features.len() != names.len() {
        return Err(mismatch());
    }

    names
        .iter()
        .map(|name| features.get(name).ok_or_else(mismatch))
        .collect()
}
