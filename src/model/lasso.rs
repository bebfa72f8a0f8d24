//! Lasso regression (L1-regularized least squares via coordinate descent)

use serde::{Deserialize, Serialize};

use crate::pipeline::{FeatureMatrix, PipelineError, PipelineResult};

pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_MAX_ITER: usize = 1000;
pub const DEFAULT_TOL: f64 = 1e-4;

/// Regression estimator consuming a finished feature matrix.
pub trait Regressor {
    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> PipelineResult<()>;

    fn predict(&self, x: &FeatureMatrix) -> PipelineResult<Vec<f64>>;
}

/// Soft-threshold operator for the L1 proximal step
fn soft_threshold(val: f64, threshold: f64) -> f64 {
    if val > threshold {
        val - threshold
    } else if val < -threshold {
        val + threshold
    } else {
        0.0
    }
}

/// Minimises `1/(2n) ||y - Xw - b||^2 + alpha ||w||_1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lasso {
    pub alpha: f64,
    pub max_iter: usize,
    /// Stop when no coefficient moves by more than this in one sweep
    pub tol: f64,
    pub coefficients: Option<Vec<f64>>,
    pub intercept: f64,
    /// Sweeps run by the last fit
    pub n_iter: usize,
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl Lasso {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            coefficients: None,
            intercept: 0.0,
            n_iter: 0,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Number of non-zero coefficients.
    pub fn n_selected(&self) -> usize {
        self.coefficients
            .as_ref()
            .map(|w| w.iter().filter(|c| **c != 0.0).count())
            .unwrap_or(0)
    }
}

impl Regressor for Lasso {
    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> PipelineResult<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::EmptyInput);
        }
        if self.alpha < 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }

        let n = n_samples as f64;
        let x_mean: Vec<f64> = (0..n_features)
            .map(|j| (0..n_samples).map(|i| x.get(i, j)).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Centered copies, column-major for the coordinate sweeps
        let x_c: Vec<Vec<f64>> = (0..n_features)
            .map(|j| (0..n_samples).map(|i| x.get(i, j) - x_mean[j]).collect())
            .collect();
        let col_norms: Vec<f64> = x_c.iter().map(|col| col.iter().map(|v| v * v).sum()).collect();

        let mut w = vec![0.0; n_features];
        let mut r: Vec<f64> = y.iter().map(|v| v - y_mean).collect();
        let lambda = self.alpha * n;

        self.n_iter = 0;
        for iter in 0..self.max_iter {
            self.n_iter = iter + 1;
            let mut max_delta = 0.0f64;

            for j in 0..n_features {
                if col_norms[j] < 1e-15 {
                    w[j] = 0.0;
                    continue;
                }
                let col = &x_c[j];
                let rho = col.iter().zip(&r).map(|(a, b)| a * b).sum::<f64>() + col_norms[j] * w[j];
                let old = w[j];
                w[j] = soft_threshold(rho, lambda) / col_norms[j];
                let delta = old - w[j];
                if delta != 0.0 {
                    for (ri, xi) in r.iter_mut().zip(col) {
                        *ri += xi * delta;
                    }
                    max_delta = max_delta.max(delta.abs());
                }
            }

            if max_delta < self.tol {
                break;
            }
        }

        if self.n_iter == self.max_iter {
            tracing::warn!(max_iter = self.max_iter, "lasso reached max_iter before converging");
        }

        self.intercept = y_mean - w.iter().zip(&x_mean).map(|(a, b)| a * b).sum::<f64>();
        self.coefficients = Some(w);

        tracing::debug!(
            alpha = self.alpha,
            iterations = self.n_iter,
            selected = self.n_selected(),
            features = n_features,
            "fitted lasso"
        );
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> PipelineResult<Vec<f64>> {
        let w = self
            .coefficients
            .as_ref()
            .ok_or_else(|| PipelineError::not_fitted("lasso"))?;
        if x.ncols() != w.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} features", w.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok((0..x.nrows())
            .map(|i| self.intercept + (0..w.len()).map(|j| x.get(i, j) * w[j]).sum::<f64>())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    fn matrix(rows: &[[f64; 3]]) -> FeatureMatrix {
        let mut m = Mat::<f64>::zeros(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                m[(i, j)] = *v;
            }
        }
        FeatureMatrix::new(vec!["a".into(), "b".into(), "c".into()], m).unwrap()
    }

    #[test]
    fn test_soft_threshold() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }

    #[test]
    fn test_recovers_sparse_signal() {
        let rows: Vec<[f64; 3]> = (0..60)
            .map(|i| {
                let t = i as f64;
                [(t * 0.37).sin(), (t * 0.11).cos(), (t * 0.73).sin() * 0.5]
            })
            .collect();
        let x = matrix(&rows);
        let y: Vec<f64> = rows.iter().map(|r| 3.0 * r[0] + 1.0).collect();

        let mut model = Lasso::new(0.01).with_tol(1e-8);
        model.fit(&x, &y).unwrap();
        let w = model.coefficients.clone().unwrap();
        assert!((w[0] - 3.0).abs() < 0.1, "w = {w:?}");
        assert!(w[1].abs() < 0.05 && w[2].abs() < 0.05, "w = {w:?}");
        assert!((model.intercept - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_large_alpha_zeroes_everything() {
        let rows = [[1.0, 2.0, 3.0], [2.0, 1.0, 0.0], [3.0, 0.0, 1.0]];
        let mut model = Lasso::new(100.0);
        model.fit(&matrix(&rows), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(model.n_selected(), 0);
        assert!((model.intercept - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = Lasso::default();
        let x = matrix(&[[0.0, 0.0, 0.0]]);
        assert!(matches!(model.predict(&x), Err(PipelineError::NotFitted { .. })));
    }
}
