//! Column router: numeric, categorical and ordinal branches plus remainder passthrough
//!
//! The router is the last step of the pipeline. It sends each configured column
//! set through its own branch and concatenates the results, in the order
//! numeric, one-hot, ordinal, remainder, into a [`FeatureMatrix`].

use std::collections::HashSet;

use faer::Mat;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::is_numeric_like;
use super::impute::{FittedMeanImputer, MeanImputer};
use super::matrix::FeatureMatrix;
use super::numeric::{FittedStandardScaler, FittedYeoJohnson, StandardScaler, YeoJohnson};
use super::onehot::{FittedOneHotEncoder, OneHotEncoder};
use super::ordinal::{FittedOrdinalEncoder, OrdinalEncoder};
use super::rare::{FittedRareCategories, RareCategoryReplacer};
use super::resolution::{column_names, ColumnResolution, Resolution};
use super::transformer::{FittedTransformer, Transformer};

pub const ROUTER_STAGE: &str = "column_transformations";

/// Switches of the numeric branch; mean imputation always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericBranch {
    pub scale: bool,
    pub power: bool,
}

impl Default for NumericBranch {
    fn default() -> Self {
        Self {
            scale: true,
            power: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRouter {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub ordinal_columns: Vec<String>,
    pub numeric: NumericBranch,
    pub rare: RareCategoryReplacer,
    pub ordinal: OrdinalEncoder,
    pub resolution: Resolution,
}

/// Learned state of every branch of the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedColumnRouter {
    pub numeric_resolution: ColumnResolution,
    pub categorical_resolution: ColumnResolution,
    pub ordinal_resolution: ColumnResolution,
    pub remainder: Vec<String>,
    pub imputer: FittedMeanImputer,
    pub scaler: Option<FittedStandardScaler>,
    pub power: Option<FittedYeoJohnson>,
    pub rare: FittedRareCategories,
    pub one_hot: FittedOneHotEncoder,
    pub ordinal: FittedOrdinalEncoder,
    /// Output column names, in output order
    pub feature_names: Vec<String>,
}

fn select(df: &DataFrame, columns: &[String]) -> PipelineResult<DataFrame> {
    Ok(df.select(columns.iter().map(|s| s.as_str()))?)
}

fn ensure_disjoint(sets: [(&str, &[String]); 3]) -> PipelineResult<()> {
    let mut owner: Vec<(&str, &str)> = Vec::new();
    for (set, columns) in sets {
        for column in columns {
            if let Some((_, other)) = owner.iter().find(|(c, _)| *c == column.as_str()) {
                if *other != set {
                    return Err(PipelineError::InvalidParameter(format!(
                        "column '{column}' is routed to both the {other} and {set} branches"
                    )));
                }
            } else {
                owner.push((column.as_str(), set));
            }
        }
    }
    Ok(())
}

impl ColumnRouter {
    pub fn name(&self) -> &'static str {
        ROUTER_STAGE
    }

    pub fn new(
        numeric_columns: Vec<String>,
        categorical_columns: Vec<String>,
        ordinal_columns: Vec<String>,
    ) -> Self {
        Self {
            numeric_columns,
            categorical_columns,
            ordinal_columns,
            numeric: NumericBranch::default(),
            rare: RareCategoryReplacer::default(),
            ordinal: OrdinalEncoder::default(),
            resolution: Resolution::Lenient,
        }
    }

    pub fn fit(&self, df: &DataFrame) -> PipelineResult<FittedColumnRouter> {
        ensure_disjoint([
            ("numeric", self.numeric_columns.as_slice()),
            ("categorical", self.categorical_columns.as_slice()),
            ("ordinal", self.ordinal_columns.as_slice()),
        ])?;

        let resolve = |columns: &[String]| {
            ColumnResolution::resolve(ROUTER_STAGE, df, Some(columns), self.resolution)
        };
        let numeric_resolution = resolve(self.numeric_columns.as_slice())?;
        let categorical_resolution = resolve(self.categorical_columns.as_slice())?;
        let ordinal_resolution = resolve(self.ordinal_columns.as_slice())?;

        let routed: HashSet<&str> = numeric_resolution
            .found
            .iter()
            .chain(&categorical_resolution.found)
            .chain(&ordinal_resolution.found)
            .map(|s| s.as_str())
            .collect();
        let remainder: Vec<String> = column_names(df)
            .into_iter()
            .filter(|name| !routed.contains(name.as_str()))
            .collect();
        for name in &remainder {
            let dtype = df.column(name)?.dtype();
            if !is_numeric_like(dtype) {
                return Err(PipelineError::NonNumericColumn {
                    column: name.clone(),
                    dtype: dtype.to_string(),
                });
            }
        }

        // Numeric branch
        let numeric = select(df, &numeric_resolution.found)?;
        let (imputer, mut numeric) = MeanImputer.fit_transform(&numeric)?;
        let scaler = if self.numeric.scale {
            let (fitted, out) = StandardScaler.fit_transform(&numeric)?;
            numeric = out;
            Some(fitted)
        } else {
            None
        };
        let power = if self.numeric.power {
            let (fitted, _) = YeoJohnson::default().fit_transform(&numeric)?;
            Some(fitted)
        } else {
            None
        };

        // Categorical branch
        let categorical = select(df, &categorical_resolution.found)?;
        let rare_replacer = RareCategoryReplacer {
            columns: None,
            ..self.rare.clone()
        };
        let (rare, categorical) = rare_replacer.fit_transform(&categorical)?;
        let one_hot = OneHotEncoder::default()
            .with_extra_category(self.rare.keyword.clone())
            .fit(&categorical)?;

        // Ordinal branch
        let ordinal_encoder = OrdinalEncoder {
            columns: None,
            ..self.ordinal.clone()
        };
        let ordinal = ordinal_encoder.fit(&select(df, &ordinal_resolution.found)?)?;

        let feature_names: Vec<String> = numeric_resolution
            .found
            .iter()
            .cloned()
            .chain(one_hot.feature_names())
            .chain(ordinal_resolution.found.iter().cloned())
            .chain(remainder.iter().cloned())
            .collect();

        tracing::debug!(
            stage = ROUTER_STAGE,
            numeric = numeric_resolution.found.len(),
            categorical = categorical_resolution.found.len(),
            ordinal = ordinal_resolution.found.len(),
            remainder = remainder.len(),
            features = feature_names.len(),
            "fitted column router"
        );

        Ok(FittedColumnRouter {
            numeric_resolution,
            categorical_resolution,
            ordinal_resolution,
            remainder,
            imputer,
            scaler,
            power,
            rare,
            one_hot,
            ordinal,
            feature_names,
        })
    }
}

impl FittedColumnRouter {
    /// Every input column the router reads, in output-group order.
    pub fn input_columns(&self) -> impl Iterator<Item = &String> {
        self.numeric_resolution
            .found
            .iter()
            .chain(&self.categorical_resolution.found)
            .chain(&self.ordinal_resolution.found)
            .chain(&self.remainder)
    }

    pub fn transform(&self, df: &DataFrame) -> PipelineResult<FeatureMatrix> {
        if let Some(absent) = self.input_columns().find(|name| df.column(name).is_err()) {
            return Err(PipelineError::missing_column(ROUTER_STAGE, absent));
        }

        let mut numeric = self
            .imputer
            .transform(&select(df, &self.numeric_resolution.found)?)?;
        if let Some(scaler) = &self.scaler {
            numeric = scaler.transform(&numeric)?;
        }
        if let Some(power) = &self.power {
            numeric = power.transform(&numeric)?;
        }

        let categorical = self
            .rare
            .transform(&select(df, &self.categorical_resolution.found)?)?;
        let one_hot = self.one_hot.transform(&categorical)?;

        let ordinal = self
            .ordinal
            .transform(&select(df, &self.ordinal_resolution.found)?)?;

        let remainder = select(df, &self.remainder)?;

        let columns: Vec<Column> = [numeric, one_hot, ordinal, remainder]
            .into_iter()
            .flat_map(|part| part.take_columns())
            .collect();

        if columns.is_empty() {
            return FeatureMatrix::new(Vec::new(), Mat::zeros(df.height(), 0));
        }
        let matrix = FeatureMatrix::from_dataframe(&DataFrame::new(columns)?)?;
        if matrix.columns() != self.feature_names.as_slice() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("features {:?}", self.feature_names),
                actual: format!("features {:?}", matrix.columns()),
            });
        }
        Ok(matrix)
    }
}
