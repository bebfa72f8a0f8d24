//! Response transform: standard scaling followed by a standardized Yeo-Johnson

use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineError, PipelineResult, PowerParams, ScaleParams};

/// Learned transform of the response variable, invertible on predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetTransform {
    pub scale: ScaleParams,
    pub power: PowerParams,
}

impl TargetTransform {
    pub fn fit(y: &[f64]) -> PipelineResult<Self> {
        if y.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        if let Some(pos) = y.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidParameter(format!(
                "target value at row {pos} is not finite"
            )));
        }
        let scale = ScaleParams::fit(y);
        let scaled: Vec<f64> = y.iter().map(|&v| scale.forward(v)).collect();
        let power = PowerParams::fit(&scaled, true);
        tracing::debug!(
            mean = scale.mean,
            scale = scale.scale,
            lambda = power.lambda,
            "fitted target transform"
        );
        Ok(Self { scale, power })
    }

    pub fn forward(&self, y: &[f64]) -> Vec<f64> {
        y.iter()
            .map(|&v| self.power.forward(self.scale.forward(v)))
            .collect()
    }

    pub fn inverse(&self, z: &[f64]) -> Vec<f64> {
        z.iter()
            .map(|&v| self.scale.inverse(self.power.inverse(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_round_trips() {
        let y: Vec<f64> = (1..40).map(|i| 50_000.0 + (i as f64).powi(3) * 40.0).collect();
        let t = TargetTransform::fit(&y).unwrap();
        let back = t.inverse(&t.forward(&y));
        for (a, b) in y.iter().zip(&back) {
            assert!((a - b).abs() / a < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(TargetTransform::fit(&[1.0, f64::NAN]).is_err());
        assert!(matches!(TargetTransform::fit(&[]), Err(PipelineError::EmptyInput)));
    }
}
