//! Ordinal encoding of explicitly ordered quality labels

use std::collections::{BTreeMap, HashSet};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::{replace_columns, string_values};
use super::resolution::{ColumnResolution, Resolution};
use super::transformer::{FittedTransformer, Transformer};

/// Default rank for out-of-vocabulary and missing values
pub const DEFAULT_UNKNOWN_ORDINAL: i64 = -1;

/// Quality scale shared by the house-price ordinal columns, lowest first.
pub fn default_quality_ordering() -> Vec<String> {
    ["Missing", "Po", "Fa", "TA", "Gd", "Ex"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Orderings applied to the encoded columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalCategories {
    /// One ordering used for every column
    Shared(Vec<String>),
    /// One ordering per resolved column, in column order
    PerColumn(Vec<Vec<String>>),
}

/// Maps ordered labels to zero-based integer ranks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    pub columns: Option<Vec<String>>,
    pub categories: OrdinalCategories,
    pub unknown_value: i64,
    #[serde(default)]
    pub resolution: Resolution,
}

impl Default for OrdinalEncoder {
    fn default() -> Self {
        Self::new(None, OrdinalCategories::Shared(default_quality_ordering()))
    }
}

impl OrdinalEncoder {
    pub fn new(columns: Option<Vec<String>>, categories: OrdinalCategories) -> Self {
        Self {
            columns,
            categories,
            unknown_value: DEFAULT_UNKNOWN_ORDINAL,
            resolution: Resolution::Lenient,
        }
    }

    pub fn with_unknown_value(mut self, unknown_value: i64) -> Self {
        self.unknown_value = unknown_value;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    fn validate_ordering(&self, column: &str, ordering: &[String]) -> PipelineResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = ordering.iter().find(|label| !seen.insert(label.as_str())) {
            return Err(PipelineError::InvalidParameter(format!(
                "ordering for column '{column}' contains duplicate label '{dup}'"
            )));
        }
        let collides = self.unknown_value >= 0 && (self.unknown_value as usize) < ordering.len();
        if collides {
            return Err(PipelineError::InvalidParameter(format!(
                "unknown_value {} collides with a real rank of column '{column}' (0..{})",
                self.unknown_value,
                ordering.len()
            )));
        }
        Ok(())
    }
}

/// Learned state of [`OrdinalEncoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedOrdinalEncoder {
    pub resolution: ColumnResolution,
    /// Column to ordering, lowest rank first
    pub orderings: BTreeMap<String, Vec<String>>,
    pub unknown_value: i64,
}

impl FittedOrdinalEncoder {
    pub fn columns(&self) -> &[String] {
        &self.resolution.found
    }

    /// Rank of `value` in the ordering of `column`, or the unknown value.
    pub fn rank(&self, column: &str, value: Option<&str>) -> i64 {
        let Some(value) = value else {
            return self.unknown_value;
        };
        self.orderings
            .get(column)
            .and_then(|ordering| ordering.iter().position(|label| label == value))
            .map(|pos| pos as i64)
            .unwrap_or(self.unknown_value)
    }
}

impl Transformer for OrdinalEncoder {
    type Fitted = FittedOrdinalEncoder;

    fn name(&self) -> &'static str {
        "ordinal_encoder"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedOrdinalEncoder> {
        let resolution =
            ColumnResolution::resolve(self.name(), df, self.columns.as_deref(), self.resolution)?;

        let orderings: BTreeMap<String, Vec<String>> = match &self.categories {
            OrdinalCategories::Shared(ordering) => resolution
                .found
                .iter()
                .map(|name| (name.clone(), ordering.clone()))
                .collect(),
            OrdinalCategories::PerColumn(orderings) => {
                if orderings.len() != resolution.found.len() {
                    return Err(PipelineError::InvalidParameter(format!(
                        "{} per-column orderings given for {} columns",
                        orderings.len(),
                        resolution.found.len()
                    )));
                }
                resolution
                    .found
                    .iter()
                    .cloned()
                    .zip(orderings.iter().cloned())
                    .collect()
            }
        };

        for (column, ordering) in &orderings {
            self.validate_ordering(column, ordering)?;
        }

        tracing::debug!(
            stage = self.name(),
            columns = ?resolution.found,
            unknown_value = self.unknown_value,
            "learned ordinal orderings"
        );

        Ok(FittedOrdinalEncoder {
            resolution,
            orderings,
            unknown_value: self.unknown_value,
        })
    }
}

impl FittedTransformer for FittedOrdinalEncoder {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let mut encoded = Vec::with_capacity(self.columns().len());
        for name in self.columns() {
            if df.column(name).is_err() {
                return Err(PipelineError::missing_column("ordinal_encoder", name));
            }
            let ranks: Vec<i64> = string_values(df, name)?
                .iter()
                .map(|value| self.rank(name, value.as_deref()))
                .collect();
            encoded.push(Column::new(name.as_str().into(), ranks));
        }
        replace_columns(df, encoded)
    }
}
