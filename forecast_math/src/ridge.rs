//! Ridge regression for small, dense design matrices
//!
//! Solves `(XcᵀXc + αI) w = Xcᵀyc` on column-centered data, so the
//! intercept is recovered from the means and is never penalized.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Pivots smaller than this are treated as a singular system
const SINGULAR_EPSILON: f64 = 1e-12;

/// Ridge (L2-regularized) linear regression estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeRegression {
    alpha: f64,
}

/// Coefficients and intercept produced by [`RidgeRegression::fit`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeFit {
    /// One coefficient per input column, in column order
    pub coefficients: Vec<f64>,
    /// Unpenalized intercept
    pub intercept: f64,
}

impl RidgeRegression {
    /// Create a new ridge estimator with the given regularization strength
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Regularization strength must be finite and non-negative, got {}",
                alpha
            )));
        }

        Ok(Self { alpha })
    }

    /// Get the regularization strength
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fit coefficients and intercept to the rows of `x` against `y`
    pub fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<RidgeFit> {
        if x.is_empty() {
            return Err(MathError::InsufficientData(
                "Ridge regression needs at least 1 sample".to_string(),
            ));
        }

        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Sample count ({}) doesn't match target count ({})",
                x.len(),
                y.len()
            )));
        }

        let n_features = x[0].len();
        if n_features == 0 {
            return Err(MathError::InvalidInput(
                "Ridge regression needs at least 1 feature".to_string(),
            ));
        }

        if let Some(row) = x.iter().position(|row| row.len() != n_features) {
            return Err(MathError::InvalidInput(format!(
                "Row {} has {} features, expected {}",
                row,
                x[row].len(),
                n_features
            )));
        }

        if x.iter().flatten().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Samples must not contain NaN or infinite values".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_mean: Vec<f64> = (0..n_features)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Gram matrix and moment vector of the centered data
        let mut gram = vec![vec![0.0; n_features]; n_features];
        let mut moment = vec![0.0; n_features];
        for (row, &target) in x.iter().zip(y.iter()) {
            let yc = target - y_mean;
            for i in 0..n_features {
                let xi = row[i] - x_mean[i];
                moment[i] += xi * yc;
                for j in 0..n_features {
                    gram[i][j] += xi * (row[j] - x_mean[j]);
                }
            }
        }

        for (i, row) in gram.iter_mut().enumerate() {
            row[i] += self.alpha;
        }

        let coefficients = solve_linear_system(gram, moment)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(x_mean.iter())
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(RidgeFit {
            coefficients,
            intercept,
        })
    }
}

impl RidgeFit {
    /// Predict a single sample whose values are in fit-time column order
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Sample has {} features, model expects {}",
                x.len(),
                self.coefficients.len()
            )));
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(x.iter())
                .map(|(w, v)| w * v)
                .sum::<f64>())
    }
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }

        if a[pivot][col].abs() < SINGULAR_EPSILON {
            return Err(MathError::CalculationError(
                "Design matrix is singular; use a positive regularization strength".to_string(),
            ));
        }

        a.swap(col, pivot);
        b.swap(col, pivot);

        let pivot_row = a[col].clone();
        for row in (col + 1)..n {
            let factor = a[row][col] / pivot_row[col];
            for (k, value) in a[row].iter_mut().enumerate().skip(col) {
                *value -= factor * pivot_row[k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i][i];
    }

    Ok(x)
}
