//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Rows scanned to infer CSV column types
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Marker the house-price CSVs use for missing cells
pub const CSV_NULL_MARKER: &str = "NA";

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// In CSV files both `NA` and empty fields become missing values.
/// `infer_schema_length` of 0 scans the whole file to infer types.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = extension_of(path);
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(schema_length)
            .with_null_values(Some(NullValues::AllColumnsSingle(CSV_NULL_MARKER.into())))
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = df.height(), columns = df.width(), "loaded dataset");
    Ok(df)
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = extension_of(path);

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}

/// Split off the target column as f64 values, returning the remaining features.
pub fn split_target(df: &DataFrame, target: &str) -> Result<(DataFrame, Vec<f64>)> {
    let column = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found in dataset", target))?;
    let values = column
        .cast(&DataType::Float64)?
        .f64()?
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.with_context(|| format!("Target column '{}' is missing at row {}", target, row))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok((df.drop(target)?, values))
}

/// Rows, columns and estimated memory in MB
pub fn dataset_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}
