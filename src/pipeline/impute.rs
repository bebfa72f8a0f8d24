//! Imputers: a constant label for categorical cells and the column mean for numeric ones

use std::collections::BTreeMap;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::{float_values, replace_columns, string_values};
use super::resolution::column_names;
use super::transformer::{FittedTransformer, Transformer};

/// Default label written into missing categorical cells
pub const DEFAULT_MISSING_CATEGORY: &str = "Missing";

/// Fills missing cells of every input column with a constant label.
///
/// Output columns are strings, whatever their input dtype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantImputer {
    pub fill_value: String,
}

impl Default for ConstantImputer {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_CATEGORY)
    }
}

impl ConstantImputer {
    pub fn new(fill_value: impl Into<String>) -> Self {
        Self {
            fill_value: fill_value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedConstantImputer {
    pub columns: Vec<String>,
    pub fill_value: String,
}

impl Transformer for ConstantImputer {
    type Fitted = FittedConstantImputer;

    fn name(&self) -> &'static str {
        "constant_imputer"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedConstantImputer> {
        let columns = column_names(df);
        tracing::debug!(
            stage = self.name(),
            fill_value = %self.fill_value,
            columns = columns.len(),
            "recorded columns for constant imputation"
        );
        Ok(FittedConstantImputer {
            columns,
            fill_value: self.fill_value.clone(),
        })
    }
}

impl FittedTransformer for FittedConstantImputer {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let mut filled = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            if df.column(name).is_err() {
                return Err(PipelineError::missing_column("constant_imputer", name));
            }
            let values: Vec<String> = string_values(df, name)?
                .into_iter()
                .map(|v| v.unwrap_or_else(|| self.fill_value.clone()))
                .collect();
            filled.push(Column::new(name.as_str().into(), values));
        }
        replace_columns(df, filled)
    }
}

/// Mean of the non-missing values, `None` when there are none.
pub fn column_mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Fills missing numeric cells with the fit-time column mean.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeanImputer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedMeanImputer {
    /// Column to fill value, for every column of the fit table
    pub means: BTreeMap<String, f64>,
    /// Fit-table column order
    pub columns: Vec<String>,
}

impl Transformer for MeanImputer {
    type Fitted = FittedMeanImputer;

    fn name(&self) -> &'static str {
        "mean_imputer"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedMeanImputer> {
        let columns = column_names(df);
        let learned: Vec<(String, Option<f64>)> = columns
            .par_iter()
            .map(|name| Ok((name.clone(), column_mean(&float_values(df, name)?))))
            .collect::<PipelineResult<_>>()?;

        let mut means = BTreeMap::new();
        for (name, mean) in learned {
            let fill = match mean {
                Some(mean) => mean,
                None => {
                    tracing::warn!(column = %name, "column has no observed values, imputing 0.0");
                    0.0
                }
            };
            means.insert(name, fill);
        }

        tracing::debug!(stage = self.name(), columns = columns.len(), "learned column means");
        Ok(FittedMeanImputer { means, columns })
    }
}

impl FittedTransformer for FittedMeanImputer {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let mut filled = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            if df.column(name).is_err() {
                return Err(PipelineError::missing_column("mean_imputer", name));
            }
            let mean = self.means[name];
            let values: Vec<f64> = float_values(df, name)?
                .into_iter()
                .map(|v| v.unwrap_or(mean))
                .collect();
            filled.push(Column::new(name.as_str().into(), values));
        }
        replace_columns(df, filled)
    }
}
