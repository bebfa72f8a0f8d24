//! Apply an inner transformer to a subset of columns only

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::frame::replace_columns;
use super::resolution::{column_names, ColumnResolution, Resolution};
use super::transformer::{FittedTransformer, Transformer};

/// Runs `inner` on the resolved target columns and passes every other column through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSubset<T> {
    pub inner: T,
    /// `None` targets every column
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub resolution: Resolution,
}

impl<T: Transformer> ColumnSubset<T> {
    pub fn new(inner: T, columns: Option<Vec<String>>) -> Self {
        Self {
            inner,
            columns,
            resolution: Resolution::Lenient,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedColumnSubset<F> {
    pub resolution: ColumnResolution,
    pub inner: F,
}

fn select_subset(df: &DataFrame, columns: &[String]) -> PipelineResult<DataFrame> {
    Ok(df.select(columns.iter().map(|s| s.as_str()))?)
}

impl<T: Transformer> Transformer for ColumnSubset<T> {
    type Fitted = FittedColumnSubset<T::Fitted>;

    fn name(&self) -> &'static str {
        "column_subset"
    }

    fn fit(&self, df: &DataFrame) -> PipelineResult<Self::Fitted> {
        let resolution =
            ColumnResolution::resolve(self.name(), df, self.columns.as_deref(), self.resolution)?;
        let sub = select_subset(df, &resolution.found)?;
        let inner = self.inner.fit(&sub)?;
        tracing::debug!(
            stage = self.name(),
            inner = self.inner.name(),
            columns = ?resolution.found,
            "fitted inner transformer on column subset"
        );
        Ok(FittedColumnSubset { resolution, inner })
    }
}

impl<F: FittedTransformer> FittedTransformer for FittedColumnSubset<F> {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let columns = &self.resolution.found;
        if columns.is_empty() {
            return Ok(df.clone());
        }
        if let Some(absent) = columns.iter().find(|name| df.column(name).is_err()) {
            return Err(PipelineError::missing_column("column_subset", absent));
        }

        let sub = select_subset(df, columns)?;
        let out = self.inner.transform(&sub)?;

        if out.height() != df.height() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} rows", df.height()),
                actual: format!("{} rows", out.height()),
            });
        }
        let out_columns = column_names(&out);
        if &out_columns != columns {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("columns {columns:?}"),
                actual: format!("columns {out_columns:?}"),
            });
        }

        replace_columns(df, out.take_columns())
    }
}
