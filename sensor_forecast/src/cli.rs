//! Command line arguments and logging setup shared by the `train` and `predict` binaries

use crate::config::ForecastConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Options common to both binaries; flags override file and environment values
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about = "Lag-feature ridge forecasting for sensor series")]
pub struct CliArgs {
    /// JSON configuration file
    #[arg(long, env = "SENSOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// CSV export of the sensor collection
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Directory holding model artifacts
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Number of lagged values per feature vector
    #[arg(long)]
    pub lag_count: Option<usize>,

    /// Ridge regularization strength
    #[arg(long)]
    pub alpha: Option<f64>,
}

impl CliArgs {
    /// Resolve the run configuration: file (or environment), then flags
    pub fn resolve(&self) -> Result<ForecastConfig> {
        let base = match &self.config {
            Some(path) => ForecastConfig::from_json_file(path)?,
            None => ForecastConfig::from_env()?,
        };
        self.apply(base)
    }

    /// Override `config` with the flags that were given, then validate
    pub fn apply(&self, mut config: ForecastConfig) -> Result<ForecastConfig> {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(dir) = &self.model_dir {
            config.model_dir = dir.clone();
        }
        if let Some(lag_count) = self.lag_count {
            config.lag_count = lag_count;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install a stderr log subscriber filtered by `RUST_LOG`
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensor_forecast=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
