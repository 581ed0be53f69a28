//! Batch pipelines: train every target, or predict every target's next value
//!
//! A failure on one target is logged and recorded in the report; other
//! targets carry on. A run fails only when no target succeeds.

pub mod prediction;
pub mod training;

pub use prediction::{PredictionPipeline, PredictionReport};
pub use training::{TargetOutcome, TrainingPipeline, TrainingReport};
