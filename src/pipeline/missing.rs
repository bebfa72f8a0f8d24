//! Missing value analysis and the missing-columns pruner

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::drop_existing;
use super::transformer::{FittedTransformer, Transformer};

/// Default ratio of missing rows above which a column is dropped
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.8;

/// Analyze missing values in the dataset.
///
/// Returns `(column, null_count / row_count)` pairs sorted by missing ratio descending.
pub fn analyze_missing_values(df: &DataFrame) -> Vec<(String, f64)> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .par_iter()
        .map(|column| (column.name().to_string(), column.null_count() as f64 / rows))
        .collect();

    // Stable sort keeps table order among equal ratios
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    missing_ratios
}

/// Get features whose missing ratio is strictly above the threshold.
pub fn get_features_above_threshold(missing_ratios: &[(String, f64)], threshold: f64) -> Vec<String> {
    missing_ratios
        .iter()
        .filter(|(_, ratio)| *ratio > threshold)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Drops columns whose fraction of missing values exceeds a threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingColumnsPruner {
    pub threshold: f64,
}

impl Default for MissingColumnsPruner {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_THRESHOLD)
    }
}

impl MissingColumnsPruner {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

/// Learned state of [`MissingColumnsPruner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedMissingColumns {
    /// Columns to drop, in descending order of missing ratio
    pub columns_to_drop: Vec<String>,
    /// Missing ratio of every column seen at fit time
    pub missing_ratios: Vec<(String, f64)>,
}

impl Transformer for MissingColumnsPruner {
    type Fitted = FittedMissingColumns;

    fn name(&self) -> &'static str {
        "remove_nan_columns"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedMissingColumns> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PipelineError::InvalidParameter(format!(
                "missing threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            )));
        }

        let missing_ratios = analyze_missing_values(df);
        let columns_to_drop = get_features_above_threshold(&missing_ratios, self.threshold);

        tracing::debug!(
            stage = self.name(),
            threshold = self.threshold,
            dropped = ?columns_to_drop,
            "learned columns with too many missing values"
        );

        Ok(FittedMissingColumns {
            columns_to_drop,
            missing_ratios,
        })
    }
}

impl FittedTransformer for FittedMissingColumns {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        Ok(drop_existing(df, &self.columns_to_drop))
    }
}
