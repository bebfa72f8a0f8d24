//! One-hot encoding over a fixed, fit-time vocabulary

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::string_values;
use super::resolution::{ColumnResolution, Resolution};
use super::transformer::{FittedTransformer, Transformer};

/// Expands each categorical column into one 0/1 indicator column per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub columns: Option<Vec<String>>,
    /// Category always added to every vocabulary (the rare keyword)
    pub extra_category: Option<String>,
    #[serde(default)]
    pub resolution: Resolution,
}

impl OneHotEncoder {
    pub fn new(columns: Option<Vec<String>>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn with_extra_category(mut self, category: impl Into<String>) -> Self {
        self.extra_category = Some(category.into());
        self
    }
}

/// Indicator column name for a category of a source column.
pub fn indicator_name(column: &str, category: &str) -> String {
    format!("{column}_{category}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedOneHotEncoder {
    pub resolution: ColumnResolution,
    /// Column to sorted vocabulary
    pub vocabularies: BTreeMap<String, Vec<String>>,
}

impl FittedOneHotEncoder {
    pub fn columns(&self) -> &[String] {
        &self.resolution.found
    }

    /// Output column names, in output order.
    pub fn feature_names(&self) -> Vec<String> {
        self.columns()
            .iter()
            .flat_map(|column| {
                self.vocabularies[column]
                    .iter()
                    .map(move |category| indicator_name(column, category))
            })
            .collect()
    }

    fn encode(&self, df: &DataFrame, column: &str) -> PipelineResult<Vec<Column>> {
        let vocabulary = &self.vocabularies[column];
        let mut indicators = vec![vec![0.0f64; df.height()]; vocabulary.len()];
        for (row, value) in string_values(df, column)?.into_iter().enumerate() {
            let Some(value) = value else {
                return Err(PipelineError::MissingValues {
                    column: column.to_string(),
                });
            };
            let Ok(pos) = vocabulary.binary_search(&value) else {
                return Err(PipelineError::UnknownCategory {
                    column: column.to_string(),
                    value,
                });
            };
            indicators[pos][row] = 1.0;
        }
        Ok(vocabulary
            .iter()
            .zip(indicators)
            .map(|(category, values)| {
                Column::new(indicator_name(column, category).into(), values)
            })
            .collect())
    }
}

impl Transformer for OneHotEncoder {
    type Fitted = FittedOneHotEncoder;

    fn name(&self) -> &'static str {
        "one_hot_encoder"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedOneHotEncoder> {
        let resolution =
            ColumnResolution::resolve(self.name(), df, self.columns.as_deref(), self.resolution)?;

        let vocabularies: BTreeMap<String, Vec<String>> = resolution
            .found
            .par_iter()
            .map(|name| {
                let mut categories: BTreeSet<String> =
                    string_values(df, name)?.into_iter().flatten().collect();
                if let Some(extra) = &self.extra_category {
                    categories.insert(extra.clone());
                }
                Ok((name.clone(), categories.into_iter().collect()))
            })
            .collect::<PipelineResult<Vec<_>>>()?
            .into_iter()
            .collect();

        let fitted = FittedOneHotEncoder {
            resolution,
            vocabularies,
        };
        tracing::debug!(
            stage = self.name(),
            columns = fitted.columns().len(),
            features = fitted.feature_names().len(),
            "learned one-hot vocabularies"
        );
        Ok(fitted)
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    /// Replaces each encoded column by its indicator columns, keeping the position.
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        for name in self.columns() {
            if df.column(name).is_err() {
                return Err(PipelineError::missing_column("one_hot_encoder", name));
            }
        }
        let mut out = Vec::new();
        for column in df.get_columns() {
            let name = column.name().as_str();
            if self.vocabularies.contains_key(name) {
                out.extend(self.encode(df, name)?);
            } else {
                out.push(column.clone());
            }
        }
        Ok(DataFrame::new(out)?)
    }
}
