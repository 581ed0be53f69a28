//! Lag feature construction shared by training and prediction
//!
//! Both modes name features `{target}_lag_{k}` for k = 1..L, where `lag_1`
//! is the value closest in time to the point being modeled. Training row i
//! uses the values at i-1..i-L; a prediction uses the L most recent known
//! values, so the last known value is `lag_1` of the next, unseen point.

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::target::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of lagged values per feature vector
pub const DEFAULT_LAG_COUNT: usize = 3;

/// Canonical name of the k-th lag feature of a target
pub fn lag_feature_name(target: Target, k: usize) -> String {
    format!("{}_lag_{}", target, k)
}

/// Named feature values in insertion order
///
/// Consumers look values up by name; the order is only kept for display and
/// deterministic serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    /// Create an empty feature vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a feature vector from name/value pairs, rejecting repeated names
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut features = Self::new();
        for (name, value) in pairs {
            let name = name.into();
            if features.get(&name).is_some() {
                return Err(ForecastError::DataError(format!(
                    "Feature '{}' given more than once",
                    name
                )));
            }
            features.entries.push((name, value));
        }
        Ok(features)
    }

    /// Set a feature, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove a feature by name, returning its value
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Value of a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Feature names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Iterate over name/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One supervised example: the lag features of a point and its observed value
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    /// Time of the labeled point
    pub time: DateTime<Utc>,
    pub features: FeatureVector,
    pub label: f64,
}

/// Builds lag feature vectors for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagFeatureBuilder {
    target: Target,
    lag_count: usize,
}

impl LagFeatureBuilder {
    /// Create a builder for `target` with `lag_count` lags
    pub fn new(target: Target, lag_count: usize) -> Result<Self> {
        if lag_count == 0 {
            return Err(ForecastError::InvalidParameter(
                "Lag count must be positive".to_string(),
            ));
        }

        Ok(Self { target, lag_count })
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn lag_count(&self) -> usize {
        self.lag_count
    }

    /// Canonical feature names `[t_lag_1, .., t_lag_L]`
    pub fn feature_names(&self) -> Vec<String> {
        (1..=self.lag_count)
            .map(|k| lag_feature_name(self.target, k))
            .collect()
    }

    /// Slide the lag window across a time-ordered series
    ///
    /// Indices below the lag count have no complete window and produce no row.
    /// Rows whose label or any lag is absent are skipped rather than imputed.
    /// The series must not contain duplicate timestamps.
    pub fn build_training_rows(&self, series: &[Observation]) -> Vec<TrainingRow> {
        let mut rows = Vec::with_capacity(series.len().saturating_sub(self.lag_count));

        for i in self.lag_count..series.len() {
            let Some(label) = finite(series[i].value) else {
                continue;
            };

            let lags: Option<Vec<f64>> = (1..=self.lag_count)
                .map(|k| finite(series[i - k].value))
                .collect();
            let Some(lags) = lags else {
                continue;
            };

            rows.push(TrainingRow {
                time: series[i].time,
                features: self.vector_from_lags(&lags),
                label,
            });
        }

        rows
    }

    /// Build the feature vector for the next, unseen point
    ///
    /// `recent` is ordered most-recent-first; only the first `lag_count`
    /// values are used. Missing history is an error, never zero-filled.
    pub fn build_prediction_features(&self, recent: &[f64]) -> Result<FeatureVector> {
        let window = recent.get(..self.lag_count).ok_or(ForecastError::InsufficientHistory {
            target: self.target,
            required: self.lag_count,
            available: recent.len(),
        })?;

        if let Some(bad) = window.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Non-finite recent value {} for {}",
                bad, self.target
            )));
        }

        Ok(self.vector_from_lags(window))
    }

    /// `lags[k - 1]` becomes `lag_k`
    fn vector_from_lags(&self, lags: &[f64]) -> FeatureVector {
        FeatureVector {
            entries: self
                .feature_names()
                .into_iter()
                .zip(lags.iter().copied())
                .collect(),
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series(values: &[Option<f64>]) -> Vec<Observation> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation {
                time: t0 + Duration::minutes(i as i64),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_zero_lag_count_rejected() {
        assert!(LagFeatureBuilder::new(Target::Watt, 0).is_err());
    }

    #[test]
    fn test_feature_names_are_canonical() {
        let builder = LagFeatureBuilder::new(Target::Temperature, 3).unwrap();
        assert_eq!(
            builder.feature_names(),
            vec!["temperature_lag_1", "temperature_lag_2", "temperature_lag_3"]
        );
    }

    #[test]
    fn test_gap_excludes_dependent_rows_only() {
        let builder = LagFeatureBuilder::new(Target::Watt, 2).unwrap();
        let s = series(&[
            Some(1.0),
            Some(2.0),
            Some(3.0),
            None,
            Some(5.0),
            Some(6.0),
            Some(7.0),
        ]);

        let rows = builder.build_training_rows(&s);
        // i=2 is complete; i=3 has no label; i=4 and i=5 need index 3; i=6 is complete.
        let labels: Vec<f64> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![3.0, 7.0]);
        assert_eq!(rows[1].features.get("watt_lag_1"), Some(6.0));
        assert_eq!(rows[1].features.get("watt_lag_2"), Some(5.0));
    }

    #[test]
    fn test_prediction_uses_only_first_lag_count_values() {
        let builder = LagFeatureBuilder::new(Target::Watt, 2).unwrap();
        let features = builder
            .build_prediction_features(&[9.0, 8.0, 7.0])
            .unwrap();
        assert_eq!(features.names(), vec!["watt_lag_1", "watt_lag_2"]);
        assert_eq!(features.get("watt_lag_2"), Some(8.0));
    }

    #[test]
    fn test_feature_vector_rejects_repeated_names() {
        let result = FeatureVector::from_pairs([("a", 1.0), ("a", 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_feature_vector_insert_replaces() {
        let mut features = FeatureVector::new();
        features.insert("a", 1.0);
        features.insert("b", 2.0);
        features.insert("a", 3.0);
        assert_eq!(features.len(), 2);
        assert_eq!(features.get("a"), Some(3.0));
        assert_eq!(features.remove("b"), Some(2.0));
        assert_eq!(features.names(), vec!["a"]);
    }
}
