//! Training pipeline: full history → lag rows → ridge fit → artifact

use crate::artifact::{ArtifactStore, FileArtifactStore};
use crate::config::ForecastConfig;
use crate::data::{series_for, Reading};
use crate::error::{ForecastError, Result};
use crate::features::LagFeatureBuilder;
use crate::models::{ForecastModel, RidgeForecast};
use crate::store::{CsvStore, TimeSeriesStore};
use crate::target::Target;
use forecast_math::FitMetrics;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// What happened to one target during a training run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum TargetOutcome {
    /// A model was fitted and persisted
    Trained { rows: usize, metrics: FitMetrics },
    /// The target was left without a new model
    Skipped { reason: String },
}

/// Per-target outcomes of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingReport {
    pub outcomes: BTreeMap<Target, TargetOutcome>,
}

impl TrainingReport {
    /// Number of targets that got a model
    pub fn trained_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, TargetOutcome::Trained { .. }))
            .count()
    }

    pub fn outcome(&self, target: Target) -> Option<&TargetOutcome> {
        self.outcomes.get(&target)
    }

    pub fn is_trained(&self, target: Target) -> bool {
        matches!(self.outcome(target), Some(TargetOutcome::Trained { .. }))
    }
}

/// Fits and persists one model per configured target
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: ForecastConfig,
}

impl TrainingPipeline {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Run against the CSV store and model directory named in the configuration
    pub fn run_from_config(&self) -> Result<TrainingReport> {
        let store = CsvStore::open(&self.config.data_path)?;
        let artifacts = FileArtifactStore::new(&self.config.model_dir);
        self.run(&store, &artifacts)
    }

    /// Train every configured target from one fetch of the store's history
    pub fn run<S, A>(&self, store: &S, artifacts: &A) -> Result<TrainingReport>
    where
        S: TimeSeriesStore,
        A: ArtifactStore,
    {
        let mut report = TrainingReport::default();

        match store.readings() {
            Ok(readings) => {
                if readings.is_empty() {
                    warn!("store returned no readings");
                }
                for &target in &self.config.targets {
                    let outcome = match self.train_target(target, &readings, artifacts) {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!(sensor = %target, error = %e, "skipping target");
                            TargetOutcome::Skipped {
                                reason: e.to_string(),
                            }
                        }
                    };
                    report.outcomes.insert(target, outcome);
                }
            }
            Err(e) => {
                error!(error = %e, "could not fetch sensor history");
                for &target in &self.config.targets {
                    report.outcomes.insert(
                        target,
                        TargetOutcome::Skipped {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        if report.trained_count() == 0 {
            return Err(ForecastError::NoTargetSucceeded(format!(
                "none of {} targets could be trained",
                self.config.targets.len()
            )));
        }

        Ok(report)
    }

    fn train_target<A: ArtifactStore>(
        &self,
        target: Target,
        readings: &[Reading],
        artifacts: &A,
    ) -> Result<TargetOutcome> {
        let series = series_for(readings, target);
        let builder = LagFeatureBuilder::new(target, self.config.lag_count)?;
        let rows = builder.build_training_rows(&series);

        if rows.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "{} has no complete {}-lag window in {} readings",
                target,
                self.config.lag_count,
                series.len()
            )));
        }

        let model = RidgeForecast::new(target, self.config.alpha)?;
        let fitted = model.fit(&rows)?;
        artifacts.save(target, &fitted)?;

        let metrics = *fitted.metrics();
        info!(
            sensor = %target,
            rows = rows.len(),
            r2 = metrics.r2,
            rmse = metrics.rmse,
            "model trained and saved"
        );

        Ok(TargetOutcome::Trained {
            rows: rows.len(),
            metrics,
        })
    }
}
