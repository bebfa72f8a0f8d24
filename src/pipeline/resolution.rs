//! Resolution of configured column names against an actual table

use std::collections::HashSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};

/// How absent configured columns are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Use only the columns actually present (production default)
    #[default]
    Lenient,
    /// Fail with `ColumnsNotFound` when any requested column is absent
    Strict,
}

/// Outcome of matching requested column names to the columns of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResolution {
    /// Names as requested (deduplicated, request order)
    pub requested: Vec<String>,
    /// Requested names present in the table, in table order
    pub found: Vec<String>,
    /// Requested names absent from the table
    pub absent: Vec<String>,
}

impl ColumnResolution {
    /// Resolve `requested` against the columns of `df`.
    ///
    /// `None` selects every column of the table.
    pub fn resolve(
        stage: &str,
        df: &DataFrame,
        requested: Option<&[String]>,
        mode: Resolution,
    ) -> PipelineResult<Self> {
        let table_columns = column_names(df);

        let Some(requested) = requested else {
            return Ok(Self {
                requested: table_columns.clone(),
                found: table_columns,
                absent: Vec::new(),
            });
        };

        let mut seen = HashSet::new();
        let requested: Vec<String> = requested
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        let wanted: HashSet<&str> = requested.iter().map(|s| s.as_str()).collect();
        let present: HashSet<&str> = table_columns.iter().map(|s| s.as_str()).collect();

        let found: Vec<String> = table_columns
            .iter()
            .filter(|name| wanted.contains(name.as_str()))
            .cloned()
            .collect();
        let absent: Vec<String> = requested
            .iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect();

        if mode == Resolution::Strict && !absent.is_empty() {
            return Err(PipelineError::ColumnsNotFound {
                stage: stage.to_string(),
                missing: absent,
            });
        }

        if !absent.is_empty() {
            tracing::debug!(stage, absent = ?absent, "skipping configured columns absent from input");
        }

        Ok(Self {
            requested,
            found,
            absent,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.absent.is_empty()
    }
}

/// Column names of a table as owned strings, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
