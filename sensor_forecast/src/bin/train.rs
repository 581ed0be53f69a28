//! Train one ridge model per sensor target and save it to the model directory.
//!
//! Exits 0 when at least one target was trained, 1 otherwise.

use anyhow::Context;
use clap::Parser;
use sensor_forecast::cli::{init_logging, CliArgs};
use sensor_forecast::{TargetOutcome, TrainingPipeline, TrainingReport};
use std::process::ExitCode;
use tracing::{error, info};

fn run(args: &CliArgs) -> anyhow::Result<TrainingReport> {
    let config = args.resolve().context("invalid configuration")?;
    info!(
        data = %config.data_path.display(),
        models = %config.model_dir.display(),
        lag_count = config.lag_count,
        "starting training run"
    );

    let pipeline = TrainingPipeline::new(config)?;
    let report = pipeline.run_from_config().context("training run failed")?;
    Ok(report)
}

fn main() -> ExitCode {
    init_logging();
    let args = CliArgs::parse();

    match run(&args) {
        Ok(report) => {
            for (target, outcome) in &report.outcomes {
                match outcome {
                    TargetOutcome::Trained { rows, metrics } => {
                        info!(sensor = %target, rows, "trained ({})", metrics)
                    }
                    TargetOutcome::Skipped { reason } => {
                        info!(sensor = %target, "skipped: {}", reason)
                    }
                }
            }
            info!(trained = report.trained_count(), "training finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
