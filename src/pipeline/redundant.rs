//! Near-constant column detection and the redundant-columns pruner

use std::collections::HashMap;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::{drop_existing, string_values};
use super::transformer::{FittedTransformer, Transformer};

/// Default share of the most frequent value above which a column is redundant
pub const DEFAULT_REDUNDANT_THRESHOLD: f64 = 0.9;

/// Relative frequency of the most common non-missing value of a column.
///
/// Returns `None` when the column has no non-missing values.
pub fn max_value_share(values: &[Option<String>]) -> Option<f64> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut observed = 0usize;
    for value in values.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
        observed += 1;
    }
    if observed == 0 {
        return None;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    Some(max_count as f64 / observed as f64)
}

/// Drops near-constant columns plus a fixed list of extra columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedundantColumnsPruner {
    pub threshold: f64,
    /// Columns always dropped, whatever their statistics
    pub additional: Vec<String>,
}

impl Default for RedundantColumnsPruner {
    fn default() -> Self {
        Self::new(DEFAULT_REDUNDANT_THRESHOLD, Vec::new())
    }
}

impl RedundantColumnsPruner {
    pub fn new(threshold: f64, additional: Vec<String>) -> Self {
        Self {
            threshold,
            additional,
        }
    }
}

/// Learned state of [`RedundantColumnsPruner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedRedundantColumns {
    /// Columns whose dominant value share exceeded the threshold, in table order
    pub columns_to_remove: Vec<String>,
    pub additional: Vec<String>,
}

impl FittedRedundantColumns {
    /// Union of learned and additional columns, learned first.
    pub fn drop_set(&self) -> Vec<String> {
        let mut all = self.columns_to_remove.clone();
        for name in &self.additional {
            if !all.contains(name) {
                all.push(name.clone());
            }
        }
        all
    }
}

impl Transformer for RedundantColumnsPruner {
    type Fitted = FittedRedundantColumns;

    fn name(&self) -> &'static str {
        "remove_redundant_columns"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedRedundantColumns> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PipelineError::InvalidParameter(format!(
                "redundant threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            )));
        }

        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        let shares: Vec<(String, Option<f64>)> = names
            .into_par_iter()
            .map(|name| {
                let values = string_values(df, &name)?;
                Ok((name, max_value_share(&values)))
            })
            .collect::<PipelineResult<_>>()?;

        let columns_to_remove: Vec<String> = shares
            .into_iter()
            .filter(|(_, share)| share.is_some_and(|s| s > self.threshold))
            .map(|(name, _)| name)
            .collect();

        tracing::debug!(
            stage = self.name(),
            threshold = self.threshold,
            near_constant = ?columns_to_remove,
            additional = ?self.additional,
            "learned redundant columns"
        );

        Ok(FittedRedundantColumns {
            columns_to_remove,
            additional: self.additional.clone(),
        })
    }
}

impl FittedTransformer for FittedRedundantColumns {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        Ok(drop_existing(df, &self.drop_set()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_value_share_ignores_missing() {
        let values = vec![
            Some("a".to_string()),
            Some("a".to_string()),
            None,
            Some("b".to_string()),
        ];
        let share = max_value_share(&values).unwrap();
        assert!((share - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_value_share_all_missing() {
        assert_eq!(max_value_share(&[None, None]), None);
    }

    #[test]
    fn test_drop_set_deduplicates() {
        let fitted = FittedRedundantColumns {
            columns_to_remove: vec!["Street".into(), "Utilities".into()],
            additional: vec!["Utilities".into(), "GarageYrBlt".into()],
        };
        assert_eq!(fitted.drop_set(), vec!["Street", "Utilities", "GarageYrBlt"]);
    }
}
