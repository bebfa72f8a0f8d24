//! Small DataFrame helpers shared by the stages

use polars::prelude::*;

use super::error::{PipelineError, PipelineResult};

/// Read a column as optional strings (any dtype is cast to String first).
pub fn string_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let as_string = column.cast(&DataType::String)?;
    Ok(as_string
        .str()?
        .iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Read a column as optional f64 values.
///
/// Fails with `NonNumericColumn` for string-like columns, whose cast would
/// silently turn every label into a missing value.
pub fn float_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    if !is_numeric_like(column.dtype()) {
        return Err(PipelineError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    let as_float = column.cast(&DataType::Float64)?;
    Ok(as_float.f64()?.iter().collect())
}

/// Whether a dtype can be represented losslessly enough as f64 for the matrix.
pub fn is_numeric_like(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean | DataType::Null)
}

/// Return a copy of `df` with the given columns replaced in place.
///
/// Each replacement keeps the position of the column it replaces.
pub fn replace_columns(df: &DataFrame, replacements: Vec<Column>) -> PipelineResult<DataFrame> {
    let mut out = df.clone();
    for column in replacements {
        out.with_column(column)?;
    }
    Ok(out)
}

/// Drop the named columns that exist in `df`; absent names are ignored.
pub fn drop_existing(df: &DataFrame, names: &[String]) -> DataFrame {
    let present: Vec<&str> = names
        .iter()
        .map(|s| s.as_str())
        .filter(|name| df.column(name).is_ok())
        .collect();
    if present.is_empty() {
        df.clone()
    } else {
        df.drop_many(present)
    }
}
