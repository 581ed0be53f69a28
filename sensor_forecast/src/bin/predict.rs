//! Predict the next value of each sensor target from its persisted model.
//!
//! Prints one JSON object `{"watt": .., ..}` on stdout and exits 0 when at
//! least one target was predicted; otherwise prints nothing and exits 1.

use anyhow::Context;
use clap::Parser;
use sensor_forecast::cli::{init_logging, CliArgs};
use sensor_forecast::PredictionPipeline;
use std::process::ExitCode;
use tracing::error;

fn run(args: &CliArgs) -> anyhow::Result<String> {
    let config = args.resolve().context("invalid configuration")?;
    let pipeline = PredictionPipeline::new(config)?;
    let report = pipeline.run_from_config().context("prediction run failed")?;
    Ok(report.to_json()?)
}

fn main() -> ExitCode {
    init_logging();
    let args = CliArgs::parse();

    match run(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
