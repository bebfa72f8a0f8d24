//! The composed preprocessing pipeline
//!
//! Four table steps run in order (drop, missing-column pruning, redundant-column
//! pruning, category imputation) and the column router turns their output into
//! the feature matrix. [`PreprocessPipeline`] only holds configuration; fitting it
//! yields a [`FittedPipeline`] which is what training persists and serving reloads.

use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::PipelineConfig;
use super::drop::DropColumns;
use super::error::{PipelineError, PipelineResult};
use super::impute::{ConstantImputer, FittedConstantImputer};
use super::matrix::FeatureMatrix;
use super::missing::{FittedMissingColumns, MissingColumnsPruner};
use super::ordinal::{OrdinalCategories, OrdinalEncoder};
use super::rare::RareCategoryReplacer;
use super::redundant::{FittedRedundantColumns, RedundantColumnsPruner};
use super::router::{ColumnRouter, FittedColumnRouter};
use super::subset::{ColumnSubset, FittedColumnSubset};
use super::transformer::{FittedTransformer, Transformer};

pub const IMPUTE_STEP: &str = "impute_missing_categories";

/// An unfitted table step of the pipeline.
#[derive(Debug, Clone)]
pub enum TableStep {
    DropColumns(DropColumns),
    MissingColumns(MissingColumnsPruner),
    RedundantColumns(RedundantColumnsPruner),
    ImputeCategories(ColumnSubset<ConstantImputer>),
}

/// Learned state of one table step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittedTableStep {
    DropColumns(DropColumns),
    MissingColumns(FittedMissingColumns),
    RedundantColumns(FittedRedundantColumns),
    ImputeCategories(FittedColumnSubset<FittedConstantImputer>),
}

impl TableStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DropColumns(step) => step.name(),
            Self::MissingColumns(step) => step.name(),
            Self::RedundantColumns(step) => step.name(),
            Self::ImputeCategories(_) => IMPUTE_STEP,
        }
    }

    fn fit_transform(&self, df: &DataFrame) -> PipelineResult<(FittedTableStep, DataFrame)> {
        Ok(match self {
            Self::DropColumns(step) => {
                let (fitted, out) = step.fit_transform(df)?;
                (FittedTableStep::DropColumns(fitted), out)
            }
            Self::MissingColumns(step) => {
                let (fitted, out) = step.fit_transform(df)?;
                (FittedTableStep::MissingColumns(fitted), out)
            }
            Self::RedundantColumns(step) => {
                let (fitted, out) = step.fit_transform(df)?;
                (FittedTableStep::RedundantColumns(fitted), out)
            }
            Self::ImputeCategories(step) => {
                let (fitted, out) = step.fit_transform(df)?;
                (FittedTableStep::ImputeCategories(fitted), out)
            }
        })
    }
}

impl FittedTableStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DropColumns(_) => "drop_useless_columns",
            Self::MissingColumns(_) => "remove_nan_columns",
            Self::RedundantColumns(_) => "remove_redundant_columns",
            Self::ImputeCategories(_) => IMPUTE_STEP,
        }
    }
}

impl FittedTransformer for FittedTableStep {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        match self {
            Self::DropColumns(step) => step.transform(df),
            Self::MissingColumns(step) => step.transform(df),
            Self::RedundantColumns(step) => step.transform(df),
            Self::ImputeCategories(step) => step.transform(df),
        }
    }
}

/// Configured, unfitted preprocessing pipeline.
#[derive(Debug, Clone, Default)]
pub struct PreprocessPipeline {
    config: PipelineConfig,
}

impl PreprocessPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Table steps in execution order.
    pub fn table_steps(&self) -> Vec<TableStep> {
        let c = &self.config;
        vec![
            TableStep::DropColumns(DropColumns::new(c.drop_columns.clone())),
            TableStep::MissingColumns(MissingColumnsPruner::new(c.missing_threshold)),
            TableStep::RedundantColumns(RedundantColumnsPruner::new(
                c.redundant_threshold,
                c.redundant_additional.clone(),
            )),
            TableStep::ImputeCategories(
                ColumnSubset::new(
                    ConstantImputer::new(c.missing_category.clone()),
                    Some(c.category_columns()),
                )
                .with_resolution(c.resolution),
            ),
        ]
    }

    pub fn router(&self) -> ColumnRouter {
        let c = &self.config;
        let mut router = ColumnRouter::new(
            c.numeric_columns.clone(),
            c.categorical_columns.clone(),
            c.ordinal_columns.clone(),
        );
        router.numeric = c.numeric;
        router.rare = RareCategoryReplacer::new(None, c.rare_threshold)
            .with_keyword(c.rare_keyword.clone())
            .with_resolution(c.resolution);
        router.ordinal = OrdinalEncoder::new(None, OrdinalCategories::Shared(c.ordinal_ordering.clone()))
            .with_unknown_value(c.unknown_ordinal)
            .with_resolution(c.resolution);
        router.resolution = c.resolution;
        router
    }

    pub fn fit(&self, raw: &DataFrame) -> PipelineResult<FittedPipeline> {
        Ok(self.fit_transform(raw)?.0)
    }

    /// Fit every step on `raw` and return the state with the training matrix.
    pub fn fit_transform(&self, raw: &DataFrame) -> PipelineResult<(FittedPipeline, FeatureMatrix)> {
        self.config.validate()?;
        if raw.height() == 0 {
            return Err(PipelineError::EmptyInput);
        }

        let mut table = raw.clone();
        let mut steps = Vec::new();
        for step in self.table_steps() {
            let (fitted, out) = step.fit_transform(&table)?;
            tracing::debug!(
                step = step.name(),
                rows = out.height(),
                columns = out.width(),
                "fitted table step"
            );
            steps.push(fitted);
            table = out;
        }

        let router = self.router().fit(&table)?;
        let matrix = router.transform(&table)?;

        let fitted = FittedPipeline {
            version: env!("CARGO_PKG_VERSION").to_string(),
            steps,
            router,
        };
        Ok((fitted, matrix))
    }
}

/// Learned state of the whole pipeline. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    /// Crate version that produced this state
    pub version: String,
    pub steps: Vec<FittedTableStep>,
    pub router: FittedColumnRouter,
}

impl FittedPipeline {
    /// Apply the table steps only.
    pub fn transform_table(&self, raw: &DataFrame) -> PipelineResult<DataFrame> {
        let mut table = raw.clone();
        for step in &self.steps {
            table = step.transform(&table)?;
        }
        Ok(table)
    }

    /// Apply the full learned pipeline.
    pub fn transform(&self, raw: &DataFrame) -> PipelineResult<FeatureMatrix> {
        self.router.transform(&self.transform_table(raw)?)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.router.feature_names
    }

    pub fn step(&self, name: &str) -> Option<&FittedTableStep> {
        self.steps.iter().find(|step| step.name() == name)
    }

    pub fn missing_columns(&self) -> Option<&FittedMissingColumns> {
        self.steps.iter().find_map(|step| match step {
            FittedTableStep::MissingColumns(fitted) => Some(fitted),
            _ => None,
        })
    }

    pub fn redundant_columns(&self) -> Option<&FittedRedundantColumns> {
        self.steps.iter().find_map(|step| match step {
            FittedTableStep::RedundantColumns(fitted) => Some(fitted),
            _ => None,
        })
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order_and_names() {
        let names: Vec<&str> = PreprocessPipeline::default()
            .table_steps()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "drop_useless_columns",
                "remove_nan_columns",
                "remove_redundant_columns",
                "impute_missing_categories"
            ]
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let df = df! { "LotArea" => Vec::<f64>::new() }.unwrap();
        assert!(matches!(
            PreprocessPipeline::default().fit(&df),
            Err(PipelineError::EmptyInput)
        ));
    }
}
