//! Regression metrics

use serde::{Deserialize, Serialize};

/// Coefficient of determination; 1.0 when the truth is constant and matched exactly.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mse: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n;
    mse.sqrt()
}

pub fn mae(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum::<f64>() / n
}

/// Scores of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Self {
        Self {
            r2: r2_score(y_true, y_pred),
            rmse: rmse(y_true, y_pred),
            mae: mae(y_true, y_pred),
            n_samples: y_true.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::evaluate(&y, &y);
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
    }

    #[test]
    fn test_mean_prediction_scores_zero() {
        let y = [1.0, 2.0, 3.0];
        assert!(r2_score(&y, &[2.0, 2.0, 2.0]).abs() < 1e-12);
        assert!((rmse(&y, &[2.0, 2.0, 2.0]) - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }
}
