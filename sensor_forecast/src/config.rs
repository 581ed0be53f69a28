//! Run configuration, loaded once at process start

use crate::error::{ForecastError, Result};
use crate::features::DEFAULT_LAG_COUNT;
use crate::models::ridge::DEFAULT_ALPHA;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const ENV_DATA_PATH: &str = "SENSOR_DATA_PATH";
pub const ENV_MODEL_DIR: &str = "SENSOR_MODEL_DIR";
pub const ENV_LAG_COUNT: &str = "SENSOR_LAG_COUNT";
pub const ENV_RIDGE_ALPHA: &str = "SENSOR_RIDGE_ALPHA";

/// Settings shared by the training and prediction pipelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// CSV export of the sensor collection
    pub data_path: PathBuf,
    /// Directory holding `model_{target}.json` artifacts
    pub model_dir: PathBuf,
    /// Number of lagged values per feature vector
    pub lag_count: usize,
    /// Ridge regularization strength
    pub alpha: f64,
    /// Targets to train and predict, in visiting order
    pub targets: Vec<Target>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sensors.csv"),
            model_dir: PathBuf::from("models"),
            lag_count: DEFAULT_LAG_COUNT,
            alpha: DEFAULT_ALPHA,
            targets: Target::ALL.to_vec(),
        }
    }
}

impl ForecastConfig {
    /// Load a configuration from a JSON file; omitted fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `SENSOR_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_MODEL_DIR) {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(lags) = lookup(ENV_LAG_COUNT) {
            self.lag_count = lags.trim().parse().map_err(|_| {
                ForecastError::ConfigError(format!("{} is not a count: {}", ENV_LAG_COUNT, lags))
            })?;
        }
        if let Some(alpha) = lookup(ENV_RIDGE_ALPHA) {
            self.alpha = alpha.trim().parse().map_err(|_| {
                ForecastError::ConfigError(format!("{} is not a number: {}", ENV_RIDGE_ALPHA, alpha))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges and the target list
    pub fn validate(&self) -> Result<()> {
        if self.lag_count == 0 {
            return Err(ForecastError::ConfigError(
                "lag_count must be at least 1".to_string(),
            ));
        }

        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ForecastError::ConfigError(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }

        if self.targets.is_empty() {
            return Err(ForecastError::ConfigError(
                "at least one target is required".to_string(),
            ));
        }

        let unique: BTreeSet<_> = self.targets.iter().collect();
        if unique.len() != self.targets.len() {
            return Err(ForecastError::ConfigError(format!(
                "targets contain duplicates: {:?}",
                self.targets
            )));
        }

        Ok(())
    }
}
