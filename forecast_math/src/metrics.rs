//! Fit-quality metrics for in-sample regression diagnostics

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// In-sample fit quality of a regression model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

/// Calculate fit metrics for predicted values against actual values
///
/// A constant `actual` series has no variance to explain: R² is 1.0 when the
/// predictions are exact and 0.0 otherwise.
pub fn fit_metrics(predicted: &[f64], actual: &[f64]) -> Result<FitMetrics> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(MathError::InvalidInput(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;

    let mut abs_sum = 0.0;
    let mut ss_residual = 0.0;
    let mut ss_total = 0.0;
    for (&p, &a) in predicted.iter().zip(actual.iter()) {
        abs_sum += (a - p).abs();
        ss_residual += (a - p).powi(2);
        ss_total += (a - mean).powi(2);
    }

    let r2 = if ss_total.abs() < 1e-12 {
        if ss_residual.abs() < 1e-12 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_residual / ss_total
    };

    Ok(FitMetrics {
        mae: abs_sum / n,
        rmse: (ss_residual / n).sqrt(),
        r2,
    })
}

impl std::fmt::Display for FitMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE {:.4}, RMSE {:.4}, R2 {:.4}",
            self.mae, self.rmse, self.r2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn test_fit_metrics() {
        let actual = vec![10.0, 12.0, 14.0, 16.0];
        let predicted = vec![11.0, 12.0, 13.0, 16.0];

        let metrics = fit_metrics(&predicted, &actual).unwrap();

        assert_abs_diff_eq!(metrics.mae, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.rmse, (0.5f64).sqrt(), epsilon = 1e-12);
        // ss_res = 2, ss_tot = 20
        assert_abs_diff_eq!(metrics.r2, 0.9, epsilon = 1e-12);
    }

    #[rstest]
    #[case(vec![5.0, 5.0], 1.0)]
    #[case(vec![5.0, 6.0], 0.0)]
    fn test_constant_actual_series(#[case] predicted: Vec<f64>, #[case] expected_r2: f64) {
        let metrics = fit_metrics(&predicted, &[5.0, 5.0]).unwrap();
        assert_abs_diff_eq!(metrics.r2, expected_r2, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(fit_metrics(&[1.0], &[1.0, 2.0]).is_err());
        assert!(fit_metrics(&[], &[]).is_err());
    }

    #[test]
    fn test_display() {
        let metrics = FitMetrics {
            mae: 0.5,
            rmse: 0.25,
            r2: 0.9,
        };
        assert_eq!(metrics.to_string(), "MAE 0.5000, RMSE 0.2500, R2 0.9000");
    }
}
