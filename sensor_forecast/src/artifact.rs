//! Persisted model artifacts, one per target
//!
//! Saving is a plain create-or-replace. Only one training run is expected to
//! write a model directory at a time; nothing here locks against concurrent
//! writers.

use crate::error::{ForecastError, Result};
use crate::models::FittedRidgeForecast;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Version of the on-disk artifact layout
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Storage for fitted models keyed by target
pub trait ArtifactStore {
    /// Persist a fitted model, replacing any previous one for the target
    fn save(&self, target: Target, model: &FittedRidgeForecast) -> Result<()>;

    /// Load the fitted model for a target
    fn load(&self, target: Target) -> Result<FittedRidgeForecast>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactEnvelope {
    format_version: u32,
    target: Target,
    model: FittedRidgeForecast,
}

/// Artifact store writing `model_{target}.json` files into a directory
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the artifacts
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path of a target's artifact
    pub fn path_for(&self, target: Target) -> PathBuf {
        self.dir.join(format!("{}.json", target.artifact_name()))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn save(&self, target: Target, model: &FittedRidgeForecast) -> Result<()> {
        if model.target() != target {
            return Err(ForecastError::ArtifactError(format!(
                "Refusing to save a {} model as {}",
                model.target(),
                target.artifact_name()
            )));
        }

        model.validate_schema()?;
        fs::create_dir_all(&self.dir)?;

        let envelope = ArtifactEnvelope {
            format_version: ARTIFACT_FORMAT_VERSION,
            target,
            model: model.clone(),
        };
        let path = self.path_for(target);
        fs::write(&path, serde_json::to_string_pretty(&envelope)?)?;

        debug!(sensor = %target, path = %path.display(), "saved model artifact");
        Ok(())
    }

    fn load(&self, target: Target) -> Result<FittedRidgeForecast> {
        let path = self.path_for(target);
        if !path.exists() {
            return Err(ForecastError::ArtifactError(format!(
                "Model file {} not found. Run training first.",
                path.display()
            )));
        }

        let envelope: ArtifactEnvelope = serde_json::from_str(&fs::read_to_string(&path)?)?;

        if envelope.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ForecastError::ArtifactError(format!(
                "{} has format version {}, expected {}",
                path.display(),
                envelope.format_version,
                ARTIFACT_FORMAT_VERSION
            )));
        }

        if envelope.target != target || envelope.model.target() != target {
            return Err(ForecastError::ArtifactError(format!(
                "{} holds a {} model, expected {}",
                path.display(),
                envelope.model.target(),
                target
            )));
        }

        envelope.model.validate_schema()?;

        debug!(sensor = %target, path = %path.display(), "loaded model artifact");
        Ok(envelope.model)
    }
}
