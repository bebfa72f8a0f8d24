//! Stateless removal of a configured list of columns

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::PipelineResult;
use super::frame::drop_existing;
use super::transformer::{FittedTransformer, Transformer};

/// Drops a fixed list of columns; names absent from the input are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropColumns {
    pub columns: Vec<String>,
}

impl DropColumns {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Transformer for DropColumns {
    type Fitted = DropColumns;

    fn name(&self) -> &'static str {
        "drop_useless_columns"
    }

    fn fit(&self, _df: &DataFrame) -> PipelineResult<DropColumns> {
        tracing::debug!(stage = self.name(), columns = ?self.columns, "dropping configured columns");
        Ok(self.clone())
    }
}

impl FittedTransformer for DropColumns {
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        Ok(drop_existing(df, &self.columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_present_and_ignores_absent() {
        let df = df! { "Id" => [1i32], "PoolQC" => ["Gd"], "LotArea" => [8450i64] }.unwrap();
        let stage = DropColumns::new(vec!["PoolQC".into(), "YrSold".into()]);
        let (_, out) = stage.fit_transform(&df).unwrap();
        let names: Vec<String> = out.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Id", "LotArea"]);
    }
}
