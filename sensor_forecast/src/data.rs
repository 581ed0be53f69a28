//! Sensor readings and loading them from tabular exports

use crate::error::{ForecastError, Result};
use crate::target::Target;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the timestamp column in sensor exports
pub const TIME_COLUMN: &str = "time";

/// One timestamped sample of every sensor field
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Sample time
    pub time: DateTime<Utc>,
    /// Values present in this sample; absent targets have no entry
    values: BTreeMap<Target, f64>,
}

/// A single point of one target's series; `None` marks an absent value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Reading {
    /// Create a reading with no values
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            values: BTreeMap::new(),
        }
    }

    /// Set a target's value; non-finite values are dropped as absent
    pub fn with_value(mut self, target: Target, value: f64) -> Self {
        self.set(target, Some(value));
        self
    }

    /// Set or clear a target's value
    pub fn set(&mut self, target: Target, value: Option<f64>) {
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                self.values.insert(target, v);
            }
            None => {
                self.values.remove(&target);
            }
        }
    }

    /// Value of a target in this reading, if present
    pub fn value(&self, target: Target) -> Option<f64> {
        self.values.get(&target).copied()
    }
}

/// Project time-ordered readings onto one target, keeping absent slots in place
pub fn series_for(readings: &[Reading], target: Target) -> Vec<Observation> {
    readings
        .iter()
        .map(|r| Observation {
            time: r.time,
            value: r.value(target),
        })
        .collect()
}

/// Data loader for sensor exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load readings from a CSV file with a `time` column and one column per target
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Reading>> {
        let path = path.as_ref();
        let file = File::open(path)?;

        if file.metadata()?.len() == 0 {
            warn!(path = %path.display(), "sensor export is empty");
            return Ok(Vec::new());
        }

        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Convert a DataFrame into readings in row order
    ///
    /// Target columns that are missing or hold non-numeric cells yield absent
    /// values for that target only. Rows without a usable time are dropped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<Reading>> {
        let times = Self::time_column(df)?;

        let mut columns = Vec::with_capacity(Target::ALL.len());
        for target in Target::ALL {
            columns.push((target, Self::target_column(df, target)?));
        }

        let mut readings = Vec::with_capacity(df.height());
        let mut dropped = 0usize;
        for (row, time) in times.into_iter().enumerate() {
            let Some(time) = time else {
                dropped += 1;
                continue;
            };

            let mut reading = Reading::new(time);
            for (target, values) in &columns {
                reading.set(*target, values[row]);
            }
            readings.push(reading);
        }

        if dropped > 0 {
            warn!(dropped, "dropped rows without a usable time");
        }
        debug!(rows = readings.len(), "loaded sensor readings");

        Ok(readings)
    }

    /// Parse the time column as RFC 3339 / `%Y-%m-%d %H:%M:%S` text or epoch milliseconds
    fn time_column(df: &DataFrame) -> Result<Vec<Option<DateTime<Utc>>>> {
        let col = df.column(TIME_COLUMN).map_err(|_| {
            ForecastError::DataError(format!("No '{}' column found in data", TIME_COLUMN))
        })?;

        let times: Vec<Option<DateTime<Utc>>> = match col.dtype() {
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .map(|cell| cell.and_then(parse_timestamp))
                .collect(),
            DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32 => {
                let millis = col.cast(&DataType::Int64)?;
                let millis = millis.i64()?;
                millis
                    .into_iter()
                    .map(|cell| cell.and_then(|ms| Utc.timestamp_millis_opt(ms).single()))
                    .collect()
            }
            other => {
                return Err(ForecastError::DataError(format!(
                    "Column '{}' has unsupported type {}",
                    TIME_COLUMN, other
                )))
            }
        };

        Ok(times)
    }

    /// Read a target column as floats; a missing column is all-absent
    fn target_column(df: &DataFrame, target: Target) -> Result<Vec<Option<f64>>> {
        let Ok(col) = df.column(target.as_str()) else {
            warn!(sensor = %target, "column missing from sensor export");
            return Ok(vec![None; df.height()]);
        };

        // Non-strict cast turns unparseable text into nulls
        let values = col.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = values.f64()?.into_iter().collect();
        Ok(values)
    }
}

/// Parse a textual timestamp, assuming UTC when no offset is given
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
