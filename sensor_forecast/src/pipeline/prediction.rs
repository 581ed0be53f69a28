//! Prediction pipeline: recent window → lag features → persisted model → forecast

use crate::artifact::{ArtifactStore, FileArtifactStore};
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::features::LagFeatureBuilder;
use crate::models::FittedForecastModel;
use crate::store::{CsvStore, TimeSeriesStore};
use crate::target::Target;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Next-value forecasts for the targets that could be predicted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionReport {
    pub predictions: BTreeMap<Target, f64>,
    /// Targets left out, with the reason
    pub skipped: BTreeMap<Target, String>,
}

impl PredictionReport {
    pub fn get(&self, target: Target) -> Option<f64> {
        self.predictions.get(&target).copied()
    }

    /// Flat JSON object mapping target names to forecasts
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.predictions)?)
    }
}

/// Applies each target's persisted model to its most recent values
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    config: ForecastConfig,
}

impl PredictionPipeline {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run against the CSV store and model directory named in the configuration
    pub fn run_from_config(&self) -> Result<PredictionReport> {
        let store = CsvStore::open(&self.config.data_path)?;
        let artifacts = FileArtifactStore::new(&self.config.model_dir);
        self.run(&store, &artifacts)
    }

    /// Predict the next value of every configured target
    ///
    /// Targets without enough history or without a usable model are skipped;
    /// a partial result is still a success.
    pub fn run<S, A>(&self, store: &S, artifacts: &A) -> Result<PredictionReport>
    where
        S: TimeSeriesStore,
        A: ArtifactStore,
    {
        let mut report = PredictionReport::default();

        for &target in &self.config.targets {
            match self.predict_target(target, store, artifacts) {
                Ok(value) => {
                    info!(sensor = %target, prediction = value, "predicted next value");
                    report.predictions.insert(target, value);
                }
                Err(e) => {
                    warn!(sensor = %target, error = %e, "skipping target");
                    report.skipped.insert(target, e.to_string());
                }
            }
        }

        if report.predictions.is_empty() {
            return Err(ForecastError::NoTargetSucceeded(format!(
                "none of {} targets could be predicted",
                self.config.targets.len()
            )));
        }

        Ok(report)
    }

    fn predict_target<S, A>(&self, target: Target, store: &S, artifacts: &A) -> Result<f64>
    where
        S: TimeSeriesStore,
        A: ArtifactStore,
    {
        let builder = LagFeatureBuilder::new(target, self.config.lag_count)?;

        let recent: Vec<f64> = store
            .fetch_recent(target, self.config.lag_count)?
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        let features = builder.build_prediction_features(&recent)?;

        let model = artifacts.load(target)?;
        model.predict(&features)
    }
}
