use approx::assert_abs_diff_eq;
use chrono::{Duration, TimeZone, Utc};
use sensor_forecast::{
    ArtifactStore, FeatureVector, FileArtifactStore, FittedForecastModel, ForecastError,
    ForecastModel, LagFeatureBuilder, Observation, RidgeForecast, Target, TrainingRow,
};
use tempfile::TempDir;

fn rows_for(target: Target, values: &[f64], lag_count: usize) -> Vec<TrainingRow> {
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let series: Vec<Observation> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Observation {
            time: t0 + Duration::minutes(i as i64),
            value: Some(*v),
        })
        .collect();

    LagFeatureBuilder::new(target, lag_count)
        .unwrap()
        .build_training_rows(&series)
}

fn sawtooth(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 20.0 + (i % 5) as f64 * 1.5 + (i % 3) as f64 * 0.4)
        .collect()
}

#[test]
fn test_fit_linear_series() {
    let rows = rows_for(Target::Watt, &[10.0, 12.0, 14.0, 16.0, 18.0, 20.0], 3);
    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    assert_eq!(fitted.lag_count(), 3);
    assert_eq!(fitted.training_rows(), 3);
    for (_, w) in fitted.coefficients() {
        assert_abs_diff_eq!(w, 0.32, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(fitted.intercept(), 4.56, epsilon = 1e-9);

    let next = LagFeatureBuilder::new(Target::Watt, 3)
        .unwrap()
        .build_prediction_features(&[20.0, 18.0, 16.0])
        .unwrap();
    assert_abs_diff_eq!(fitted.predict(&next).unwrap(), 21.84, epsilon = 1e-9);
}

#[test]
fn test_fit_requires_rows() {
    let result = RidgeForecast::new(Target::Humidity, 1.0).unwrap().fit(&[]);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_save_load_predict_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileArtifactStore::new(dir.path());

    let rows = rows_for(Target::Temperature, &sawtooth(60), 3);
    let fitted = RidgeForecast::new(Target::Temperature, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    store.save(Target::Temperature, &fitted).unwrap();
    assert!(store.path_for(Target::Temperature).ends_with("model_temperature.json"));

    let loaded = store.load(Target::Temperature).unwrap();
    assert_eq!(loaded.feature_names(), fitted.feature_names());

    let before = fitted.predict_rows(&rows).unwrap();
    let after = loaded.predict_rows(&rows).unwrap();
    for (a, b) in before.iter().zip(after.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
    }

    // Residuals on the fitting rows agree with the stored fit metrics
    let n = rows.len() as f64;
    let mae: f64 = after
        .iter()
        .zip(rows.iter())
        .map(|(p, r)| (r.label - p).abs())
        .sum::<f64>()
        / n;
    assert_abs_diff_eq!(mae, loaded.metrics().mae, epsilon = 1e-9);
}

#[test]
fn test_missing_feature_is_mismatch() {
    let rows = rows_for(Target::Watt, &sawtooth(20), 3);
    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    let mut features = rows[0].features.clone();
    features.remove("watt_lag_3");

    match fitted.predict(&features) {
        Err(ForecastError::FeatureMismatch { expected, found }) => {
            assert_eq!(expected, vec!["watt_lag_1", "watt_lag_2", "watt_lag_3"]);
            assert_eq!(found, vec!["watt_lag_1", "watt_lag_2"]);
        }
        other => panic!("expected FeatureMismatch, got {:?}", other),
    }
}

#[test]
fn test_extra_feature_is_mismatch() {
    let rows = rows_for(Target::Watt, &sawtooth(20), 3);
    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    let mut features = rows[0].features.clone();
    features.insert("watt_lag_4", 1.0);

    assert!(matches!(
        fitted.predict(&features),
        Err(ForecastError::FeatureMismatch { .. })
    ));
}

#[test]
fn test_renamed_or_recased_feature_is_mismatch() {
    let rows = rows_for(Target::Watt, &sawtooth(20), 2);
    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    let recased = FeatureVector::from_pairs([("Watt_lag_1", 1.0), ("watt_lag_2", 2.0)]).unwrap();
    assert!(matches!(
        fitted.predict(&recased),
        Err(ForecastError::FeatureMismatch { .. })
    ));

    // Same lag count, different target: a model/code skew, never coerced
    let other_target = LagFeatureBuilder::new(Target::Humidity, 2)
        .unwrap()
        .build_prediction_features(&[1.0, 2.0])
        .unwrap();
    assert!(matches!(
        fitted.predict(&other_target),
        Err(ForecastError::FeatureMismatch { .. })
    ));
}

#[test]
fn test_lag_count_skew_is_mismatch() {
    let rows = rows_for(Target::Watt, &sawtooth(20), 3);
    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    let two_lags = LagFeatureBuilder::new(Target::Watt, 2)
        .unwrap()
        .build_prediction_features(&[1.0, 2.0])
        .unwrap();
    assert!(matches!(
        fitted.predict(&two_lags),
        Err(ForecastError::FeatureMismatch { .. })
    ));
}

#[test]
fn test_feature_order_binds_by_name_not_position() {
    // Asymmetric dynamics so each lag gets a distinct coefficient
    let mut values = vec![1.0, 3.0, 2.0];
    for i in 3..80 {
        let next = 0.6 * values[i - 1] - 0.3 * values[i - 2] + 0.1 * values[i - 3] + (i % 7) as f64;
        values.push(next);
    }
    let rows = rows_for(Target::Watt, &values, 3);
    let fitted = RidgeForecast::new(Target::Watt, 0.01)
        .unwrap()
        .fit(&rows)
        .unwrap();

    let coefficients: Vec<f64> = fitted.coefficients().iter().map(|(_, w)| *w).collect();
    assert!((coefficients[0] - coefficients[2]).abs() > 1e-3);

    let recent = [5.0, 2.0, 7.0];
    let canonical = LagFeatureBuilder::new(Target::Watt, 3)
        .unwrap()
        .build_prediction_features(&recent)
        .unwrap();
    let reversed = FeatureVector::from_pairs([
        ("watt_lag_3", 7.0),
        ("watt_lag_2", 2.0),
        ("watt_lag_1", 5.0),
    ])
    .unwrap();

    let expected = fitted.intercept()
        + coefficients[0] * recent[0]
        + coefficients[1] * recent[1]
        + coefficients[2] * recent[2];

    assert_abs_diff_eq!(fitted.predict(&canonical).unwrap(), expected, epsilon = 1e-9);
    assert_abs_diff_eq!(fitted.predict(&reversed).unwrap(), expected, epsilon = 1e-9);

    // Feeding the window oldest-first under canonical names is a different forecast
    let misordered = LagFeatureBuilder::new(Target::Watt, 3)
        .unwrap()
        .build_prediction_features(&[7.0, 2.0, 5.0])
        .unwrap();
    assert!((fitted.predict(&misordered).unwrap() - expected).abs() > 1e-6);
}

#[test]
fn test_load_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let store = FileArtifactStore::new(dir.path());

    match store.load(Target::Watt) {
        Err(ForecastError::ArtifactError(msg)) => assert!(msg.contains("model_watt.json")),
        other => panic!("expected ArtifactError, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_artifact_of_other_target() {
    let dir = TempDir::new().unwrap();
    let store = FileArtifactStore::new(dir.path());

    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows_for(Target::Watt, &sawtooth(10), 3))
        .unwrap();
    store.save(Target::Watt, &fitted).unwrap();

    std::fs::copy(
        store.path_for(Target::Watt),
        store.path_for(Target::Humidity),
    )
    .unwrap();

    assert!(matches!(
        store.load(Target::Humidity),
        Err(ForecastError::ArtifactError(_))
    ));
    assert!(store.save(Target::Humidity, &fitted).is_err());
}

#[test]
fn test_save_rejects_non_canonical_feature_order() {
    let dir = TempDir::new().unwrap();
    let store = FileArtifactStore::new(dir.path());

    let rows: Vec<TrainingRow> = rows_for(Target::Watt, &sawtooth(12), 2)
        .into_iter()
        .map(|row| {
            let lag_1 = row.features.get("watt_lag_1").unwrap();
            let lag_2 = row.features.get("watt_lag_2").unwrap();
            TrainingRow {
                features: FeatureVector::from_pairs([
                    ("watt_lag_2", lag_2),
                    ("watt_lag_1", lag_1),
                ])
                .unwrap(),
                ..row
            }
        })
        .collect();
    let fitted = RidgeForecast::new(Target::Watt, 1.0)
        .unwrap()
        .fit(&rows)
        .unwrap();

    assert!(matches!(
        store.save(Target::Watt, &fitted),
        Err(ForecastError::ArtifactError(_))
    ));
    assert!(!store.path_for(Target::Watt).exists());
}

#[test]
fn test_retraining_replaces_artifact() {
    let dir = TempDir::new().unwrap();
    let store = FileArtifactStore::new(dir.path());
    let model = RidgeForecast::new(Target::Watt, 1.0).unwrap();

    let first = model.fit(&rows_for(Target::Watt, &sawtooth(10), 3)).unwrap();
    store.save(Target::Watt, &first).unwrap();

    let second = model
        .fit(&rows_for(Target::Watt, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3))
        .unwrap();
    store.save(Target::Watt, &second).unwrap();

    let loaded = store.load(Target::Watt).unwrap();
    assert_eq!(loaded.training_rows(), 3);
    assert_eq!(loaded.trained_at(), second.trained_at());
    assert_abs_diff_eq!(loaded.intercept(), second.intercept(), epsilon = 1e-9);
    assert_ne!(first.training_rows(), loaded.training_rows());
}
