//! JSON row records to a table, the serving-boundary input format

use polars::prelude::*;
use serde_json::Value;

use crate::pipeline::{PipelineError, PipelineResult};

/// Convert a JSON array of row objects into a table.
///
/// A column whose non-null values are all numbers becomes Float64; any other
/// column becomes String. `null` and absent keys are missing values.
/// Columns appear in first-seen order.
pub fn records_to_dataframe(records: &Value) -> PipelineResult<DataFrame> {
    let rows = records.as_array().ok_or_else(|| {
        PipelineError::InvalidParameter("records must be a JSON array of objects".to_string())
    })?;

    let mut names: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let object = row.as_object().ok_or_else(|| {
            PipelineError::InvalidParameter(format!("record {i} is not a JSON object"))
        })?;
        for key in object.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns: Vec<Column> = names
        .iter()
        .map(|name| {
            let cells: Vec<Option<&Value>> = rows
                .iter()
                .map(|row| row.get(name).filter(|v| !v.is_null()))
                .collect();
            let numeric = cells.iter().flatten().all(|v| v.is_number());
            if numeric {
                let values: Vec<Option<f64>> =
                    cells.iter().map(|v| v.and_then(Value::as_f64)).collect();
                Column::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|v| {
                        v.map(|v| match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                    })
                    .collect();
                Column::new(name.as_str().into(), values)
            }
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Parse a JSON document of row records.
pub fn records_from_str(text: &str) -> PipelineResult<DataFrame> {
    let value: Value = serde_json::from_str(text)?;
    records_to_dataframe(&value)
}
