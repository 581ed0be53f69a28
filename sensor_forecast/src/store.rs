//! Time series stores the pipelines read sensor history from
//!
//! A store is opened once per pipeline run and dropped when the run ends,
//! on success and failure alike.

use crate::data::{series_for, DataLoader, Observation, Reading};
use crate::error::{ForecastError, Result};
use crate::target::Target;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Query surface the pipelines need from a sensor store
pub trait TimeSeriesStore {
    /// Every reading, strictly ordered by increasing time
    fn readings(&self) -> Result<Vec<Reading>>;

    /// Full history of one target in time order, absent values kept in place
    fn fetch_all(&self, target: Target) -> Result<Vec<Observation>> {
        Ok(series_for(&self.readings()?, target))
    }

    /// Values of `target` among the `count` most recent readings, most-recent-first
    ///
    /// Readings where the target is absent are left out, so the result can be
    /// shorter than `count` but never reaches past a gap into older data.
    fn fetch_recent(&self, target: Target, count: usize) -> Result<Vec<(DateTime<Utc>, f64)>>;
}

/// In-memory store over readings sorted by time
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    readings: Vec<Reading>,
}

impl MemoryStore {
    /// Create a store, sorting readings by time and rejecting duplicate timestamps
    pub fn new(mut readings: Vec<Reading>) -> Result<Self> {
        readings.sort_by_key(|r| r.time);

        if let Some(pair) = readings.windows(2).find(|pair| pair[0].time == pair[1].time) {
            return Err(ForecastError::DuplicateTimestamp(pair[0].time));
        }

        Ok(Self { readings })
    }

    /// Number of readings held
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if the store holds no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl TimeSeriesStore for MemoryStore {
    fn readings(&self) -> Result<Vec<Reading>> {
        Ok(self.readings.clone())
    }

    fn fetch_all(&self, target: Target) -> Result<Vec<Observation>> {
        Ok(series_for(&self.readings, target))
    }

    fn fetch_recent(&self, target: Target, count: usize) -> Result<Vec<(DateTime<Utc>, f64)>> {
        Ok(self
            .readings
            .iter()
            .rev()
            .take(count)
            .filter_map(|r| r.value(target).map(|v| (r.time, v)))
            .collect())
    }
}

/// Store backed by a CSV export of the sensor collection
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl CsvStore {
    /// Open and load a CSV export
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let readings = DataLoader::from_csv(&path).map_err(|e| {
            ForecastError::StoreUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let inner = MemoryStore::new(readings)?;

        if inner.is_empty() {
            warn!(path = %path.display(), "sensor store holds no readings");
        } else {
            info!(path = %path.display(), readings = inner.len(), "opened sensor store");
        }

        Ok(Self { path, inner })
    }

    /// Path of the backing export
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimeSeriesStore for CsvStore {
    fn readings(&self) -> Result<Vec<Reading>> {
        self.inner.readings()
    }

    fn fetch_all(&self, target: Target) -> Result<Vec<Observation>> {
        self.inner.fetch_all(target)
    }

    fn fetch_recent(&self, target: Target, count: usize) -> Result<Vec<(DateTime<Utc>, f64)>> {
        self.inner.fetch_recent(target, count)
    }
}
