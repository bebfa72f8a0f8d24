//! Rare and unseen category replacement
//!
//! The replacer learns, per categorical column, the full vocabulary seen at fit
//! time and the subset of it that is rare. At transform time both rare values and
//! values outside the vocabulary become the sentinel keyword, so a downstream
//! fixed-vocabulary encoder only ever sees labels it was fit on (plus the keyword).

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::{replace_columns, string_values};
use super::resolution::{ColumnResolution, Resolution};
use super::transformer::{FittedTransformer, Transformer};

/// Default relative frequency below which a category is rare
pub const DEFAULT_RARE_THRESHOLD: f64 = 0.05;

/// Default label substituted for rare and unseen categories
pub const DEFAULT_RARE_KEYWORD: &str = "Other";

/// Relative frequency of each distinct non-missing value.
pub fn category_proportions(values: &[Option<String>]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut observed = 0usize;
    for value in values.iter().flatten() {
        *counts.entry(value.clone()).or_insert(0) += 1;
        observed += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| (category, count as f64 / observed as f64))
        .collect()
}

/// Replaces rare and previously unseen category values with a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RareCategoryReplacer {
    /// Target columns; `None` means every column of the fit table
    pub columns: Option<Vec<String>>,
    pub threshold: f64,
    pub keyword: String,
    #[serde(default)]
    pub resolution: Resolution,
}

impl Default for RareCategoryReplacer {
    fn default() -> Self {
        Self::new(None, DEFAULT_RARE_THRESHOLD)
    }
}

impl RareCategoryReplacer {
    pub fn new(columns: Option<Vec<String>>, threshold: f64) -> Self {
        Self {
            columns,
            threshold,
            keyword: DEFAULT_RARE_KEYWORD.to_string(),
            resolution: Resolution::Lenient,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Vocabulary learned for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    /// Every category observed at fit time
    pub accepted: BTreeSet<String>,
    /// Observed categories whose frequency is below the threshold
    pub rare: BTreeSet<String>,
}

impl CategoryVocabulary {
    /// Whether `value` must be replaced by the keyword.
    pub fn is_to_replace(&self, value: &str) -> bool {
        self.rare.contains(value) || !self.accepted.contains(value)
    }
}

/// Learned state of [`RareCategoryReplacer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedRareCategories {
    pub resolution: ColumnResolution,
    pub keyword: String,
    pub vocabularies: BTreeMap<String, CategoryVocabulary>,
}

impl FittedRareCategories {
    /// Columns handled by this state, in fit-table order.
    pub fn columns(&self) -> &[String] {
        &self.resolution.found
    }

    fn replace_values(&self, column: &str, values: Vec<Option<String>>) -> Vec<String> {
        let vocabulary = &self.vocabularies[column];
        values
            .into_iter()
            .map(|value| match value {
                Some(v) if !vocabulary.is_to_replace(&v) => v,
                _ => self.keyword.clone(),
            })
            .collect()
    }
}

impl Transformer for RareCategoryReplacer {
    type Fitted = FittedRareCategories;

    fn name(&self) -> &'static str {
        "replace_rare"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<FittedRareCategories> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PipelineError::InvalidParameter(format!(
                "rare threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            )));
        }

        let resolution =
            ColumnResolution::resolve(self.name(), df, self.columns.as_deref(), self.resolution)?;

        let vocabularies: BTreeMap<String, CategoryVocabulary> = resolution
            .found
            .par_iter()
            .map(|name| {
                let proportions = category_proportions(&string_values(df, name)?);
                let rare = proportions
                    .iter()
                    .filter(|(_, share)| **share < self.threshold)
                    .map(|(category, _)| category.clone())
                    .collect();
                let accepted = proportions.into_keys().collect();
                Ok((name.clone(), CategoryVocabulary { accepted, rare }))
            })
            .collect::<PipelineResult<Vec<_>>>()?
            .into_iter()
            .collect();

        for (name, vocabulary) in &vocabularies {
            tracing::debug!(
                stage = self.name(),
                column = %name,
                accepted = vocabulary.accepted.len(),
                rare = vocabulary.rare.len(),
                "learned category vocabulary"
            );
        }

        Ok(FittedRareCategories {
            resolution,
            keyword: self.keyword.clone(),
            vocabularies,
        })
    }
}

impl FittedTransformer for FittedRareCategories {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let mut replacements = Vec::with_capacity(self.columns().len());
        for name in self.columns() {
            if df.column(name).is_err() {
                return Err(PipelineError::missing_column("replace_rare", name));
            }
            let replaced = self.replace_values(name, string_values(df, name)?);
            replacements.push(Column::new(name.as_str().into(), replaced));
        }
        replace_columns(df, replacements)
    }
}
