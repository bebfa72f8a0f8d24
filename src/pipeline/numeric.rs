//! Numeric transforms: standard scaling and the Yeo-Johnson power transform
//!
//! Both work column by column. The per-column parameters ([`ScaleParams`],
//! [`PowerParams`]) are plain values with forward and inverse maps so the
//! target transform can reuse them on a single response vector.

use std::collections::BTreeMap;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::{float_values, replace_columns};
use super::resolution::column_names;
use super::transformer::{FittedTransformer, Transformer};

/// Search interval for the Yeo-Johnson lambda
pub const LAMBDA_BOUNDS: (f64, f64) = (-5.0, 5.0);

const LAMBDA_TOL: f64 = 1e-8;
const MAX_SEARCH_ITER: usize = 200;

/// Population mean and standard deviation.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Affine standardisation parameters of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleParams {
    pub mean: f64,
    /// Divisor; 1.0 for constant columns
    pub scale: f64,
}

impl ScaleParams {
    pub fn fit(values: &[f64]) -> Self {
        let (mean, std) = mean_std(values);
        let scale = if std > 0.0 && std.is_finite() { std } else { 1.0 };
        Self { mean, scale }
    }

    pub fn forward(&self, x: f64) -> f64 {
        (x - self.mean) / self.scale
    }

    pub fn inverse(&self, z: f64) -> f64 {
        z * self.scale + self.mean
    }
}

/// Yeo-Johnson transform of a single value.
pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda.abs() < f64::EPSILON {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if (lambda - 2.0).abs() < f64::EPSILON {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

/// Inverse of [`yeo_johnson`].
pub fn yeo_johnson_inverse(y: f64, lambda: f64) -> f64 {
    if y >= 0.0 {
        if lambda.abs() < f64::EPSILON {
            y.exp_m1()
        } else {
            (y * lambda + 1.0).powf(1.0 / lambda) - 1.0
        }
    } else if (lambda - 2.0).abs() < f64::EPSILON {
        1.0 - (-y).exp()
    } else {
        1.0 - (1.0 - (2.0 - lambda) * y).powf(1.0 / (2.0 - lambda))
    }
}

/// Profile log-likelihood of `lambda` under a normal model of the transformed data.
pub fn yeo_johnson_log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
    let (_, std) = mean_std(&transformed);
    let variance = std * std;
    let jacobian: f64 = values.iter().map(|x| x.signum() * x.abs().ln_1p()).sum();
    let ll = -n / 2.0 * variance.ln() + (lambda - 1.0) * jacobian;
    if ll.is_finite() {
        ll
    } else {
        f64::NEG_INFINITY
    }
}

/// Maximum-likelihood lambda found by golden-section search over [`LAMBDA_BOUNDS`].
pub fn optimal_lambda(values: &[f64]) -> f64 {
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let (mut a, mut b) = LAMBDA_BOUNDS;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = yeo_johnson_log_likelihood(values, c);
    let mut fd = yeo_johnson_log_likelihood(values, d);

    for _ in 0..MAX_SEARCH_ITER {
        if (b - a).abs() < LAMBDA_TOL {
            break;
        }
        if fc >= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = yeo_johnson_log_likelihood(values, c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = yeo_johnson_log_likelihood(values, d);
        }
    }
    (a + b) / 2.0
}

/// Yeo-Johnson parameters of one column, with optional output standardisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerParams {
    pub lambda: f64,
    pub standardize: Option<ScaleParams>,
}

impl PowerParams {
    pub fn fit(values: &[f64], standardize: bool) -> Self {
        let (_, std) = mean_std(values);
        let lambda = if std > 0.0 { optimal_lambda(values) } else { 1.0 };
        let standardize = standardize.then(|| {
            let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
            ScaleParams::fit(&transformed)
        });
        Self {
            lambda,
            standardize,
        }
    }

    pub fn forward(&self, x: f64) -> f64 {
        let y = yeo_johnson(x, self.lambda);
        match &self.standardize {
            Some(scale) => scale.forward(y),
            None => y,
        }
    }

    pub fn inverse(&self, z: f64) -> f64 {
        let y = match &self.standardize {
            Some(scale) => scale.inverse(z),
            None => z,
        };
        yeo_johnson_inverse(y, self.lambda)
    }
}

fn observed(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

fn map_columns(
    stage: &str,
    df: &DataFrame,
    columns: &[String],
    f: impl Fn(&str, f64) -> f64,
) -> PipelineResult<DataFrame> {
    let mut mapped = Vec::with_capacity(columns.len());
    for name in columns {
        if df.column(name).is_err() {
            return Err(PipelineError::missing_column(stage, name));
        }
        let values: Vec<Option<f64>> = float_values(df, name)?
            .into_iter()
            .map(|v| v.map(|x| f(name, x)))
            .collect();
        mapped.push(Column::new(name.as_str().into(), values));
    }
    replace_columns(df, mapped)
}

/// Centers each column and divides by its population standard deviation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedStandardScaler {
    pub columns: Vec<String>,
    pub params: BTreeMap<String, ScaleParams>,
}

impl Transformer for StandardScaler {
    type Fitted = FittedStandardScaler;

    fn name(&self) -> &'static str {
        "standard_scaler"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedStandardScaler> {
        let columns = column_names(df);
        let learned: Vec<(String, ScaleParams, bool)> = columns
            .par_iter()
            .map(|name| {
                let values = observed(&float_values(df, name)?);
                let constant = mean_std(&values).1 == 0.0;
                Ok((name.clone(), ScaleParams::fit(&values), constant))
            })
            .collect::<PipelineResult<_>>()?;

        let mut params = BTreeMap::new();
        for (name, p, constant) in learned {
            if constant {
                tracing::warn!(column = %name, "zero variance column, scaling by 1.0");
            }
            params.insert(name, p);
        }

        tracing::debug!(stage = self.name(), columns = columns.len(), "learned scaling parameters");
        Ok(FittedStandardScaler { columns, params })
    }
}

impl FittedTransformer for FittedStandardScaler {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        map_columns("standard_scaler", df, &self.columns, |name, x| {
            self.params[name].forward(x)
        })
    }
}

/// Column-wise Yeo-Johnson with maximum-likelihood lambdas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YeoJohnson {
    pub standardize: bool,
}

impl Default for YeoJohnson {
    fn default() -> Self {
        Self { standardize: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedYeoJohnson {
    pub columns: Vec<String>,
    pub params: BTreeMap<String, PowerParams>,
}

impl Transformer for YeoJohnson {
    type Fitted = FittedYeoJohnson;

    fn name(&self) -> &'static str {
        "yeo_johnson"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedYeoJohnson> {
        let columns = column_names(df);
        let params: BTreeMap<String, PowerParams> = columns
            .par_iter()
            .map(|name| {
                let values = observed(&float_values(df, name)?);
                Ok((name.clone(), PowerParams::fit(&values, self.standardize)))
            })
            .collect::<PipelineResult<Vec<_>>>()?
            .into_iter()
            .collect();

        tracing::debug!(
            stage = self.name(),
            lambdas = ?params.iter().map(|(k, p)| (k.as_str(), p.lambda)).collect::<Vec<_>>(),
            "learned power transform lambdas"
        );
        Ok(FittedYeoJohnson { columns, params })
    }
}

impl FittedTransformer for FittedYeoJohnson {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        map_columns("yeo_johnson", df, &self.columns, |name, x| {
            self.params[name].forward(x)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_params_constant_column() {
        let p = ScaleParams::fit(&[3.0, 3.0, 3.0]);
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.forward(3.0), 0.0);
    }

    #[test]
    fn test_yeo_johnson_identity_at_lambda_one() {
        for x in [-3.0, -0.5, 0.0, 0.5, 10.0] {
            assert!((yeo_johnson(x, 1.0) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_yeo_johnson_inverse_round_trips() {
        for lambda in [-1.5, 0.0, 0.5, 2.0, 3.0] {
            for x in [-4.0, -1.0, 0.0, 0.3, 7.5] {
                let back = yeo_johnson_inverse(yeo_johnson(x, lambda), lambda);
                assert!((back - x).abs() < 1e-8, "lambda={lambda} x={x} back={back}");
            }
        }
    }

    #[test]
    fn test_optimal_lambda_reduces_right_skew() {
        let values: Vec<f64> = (1..=50).map(|i| (i as f64 / 5.0).exp()).collect();
        let lambda = optimal_lambda(&values);
        assert!(lambda < 1.0, "lambda={lambda}");
    }

    #[test]
    fn test_power_params_standardized_output() {
        let values: Vec<f64> = (0..20).map(|i| (i * i) as f64).collect();
        let params = PowerParams::fit(&values, true);
        let out: Vec<f64> = values.iter().map(|&x| params.forward(x)).collect();
        let (mean, std) = mean_std(&out);
        assert!(mean.abs() < 1e-9);
        assert!((std - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaler_keeps_nulls() {
        let df = df! { "a" => [Some(1.0f64), None, Some(3.0)] }.unwrap();
        let out = StandardScaler.fit_transform(&df).unwrap().1;
        let values: Vec<Option<f64>> = out.column("a").unwrap().f64().unwrap().iter().collect();
        assert_eq!(values, vec![Some(-1.0), None, Some(1.0)]);
    }
}
