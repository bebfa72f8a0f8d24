//! Shared test utilities and fixture generators
#![allow(dead_code)]

use housefit::pipeline::{NumericBranch, PipelineConfig};
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const NEIGHBORHOODS: [&str; 4] = ["NAmes", "CollgCr", "OldTown", "Edwards"];
const EXTER_QUAL: [&str; 4] = ["TA", "Gd", "Ex", "Fa"];

/// Create a house-price-like DataFrame with `rows` rows (at least 20)
///
/// Column characteristics under the default config:
/// - `Id`, `PoolQC`: configured drops
/// - `Alley`: 95% missing, dropped by the missing pruner
/// - `Utilities`: constant, dropped by the redundant pruner
/// - `LotArea`, `GrLivArea`: clean numeric; `LotFrontage`: numeric with nulls
/// - `Neighborhood`, `Street`: categorical; `ExterQual`, `BsmtQual`: ordinal
/// - `OverallQual`: integer remainder column
/// - `SalePrice`: linear in the area columns plus a neighborhood premium
pub fn create_house_dataframe(rows: usize) -> DataFrame {
    let ids: Vec<i64> = (1..=rows as i64).collect();
    let lot_area: Vec<f64> = (0..rows).map(|i| 5000.0 + ((i * 137) % 4000) as f64).collect();
    let gr_liv_area: Vec<f64> = (0..rows).map(|i| 800.0 + ((i * 53) % 1500) as f64).collect();
    let lot_frontage: Vec<Option<f64>> = (0..rows)
        .map(|i| if i % 5 == 0 { None } else { Some(50.0 + (i % 30) as f64) })
        .collect();
    let neighborhood: Vec<&str> = (0..rows).map(|i| NEIGHBORHOODS[i % 4]).collect();
    let street: Vec<&str> = (0..rows).map(|i| if i % 4 == 0 { "Grvl" } else { "Pave" }).collect();
    let alley: Vec<Option<&str>> = (0..rows).map(|i| if i == 3 { Some("Grvl") } else { None }).collect();
    let pool_qc: Vec<Option<&str>> = (0..rows).map(|i| if i == 7 { Some("Ex") } else { None }).collect();
    let utilities: Vec<&str> = vec!["AllPub"; rows];
    let exter_qual: Vec<&str> = (0..rows).map(|i| EXTER_QUAL[i % 4]).collect();
    let bsmt_qual: Vec<Option<&str>> = (0..rows)
        .map(|i| if i % 7 == 0 { None } else if i % 2 == 0 { Some("TA") } else { Some("Gd") })
        .collect();
    let overall_qual: Vec<i64> = (0..rows).map(|i| 1 + (i % 10) as i64).collect();
    let sale_price: Vec<f64> = (0..rows)
        .map(|i| 20_000.0 + 60.0 * gr_liv_area[i] + 2.0 * lot_area[i] + 5_000.0 * (i % 4) as f64)
        .collect();

    df! {
        "Id" => ids,
        "LotArea" => lot_area,
        "LotFrontage" => lot_frontage,
        "GrLivArea" => gr_liv_area,
        "Neighborhood" => neighborhood,
        "Street" => street,
        "Alley" => alley,
        "PoolQC" => pool_qc,
        "Utilities" => utilities,
        "ExterQual" => exter_qual,
        "BsmtQual" => bsmt_qual,
        "OverallQual" => overall_qual,
        "SalePrice" => sale_price,
    }
    .unwrap()
}

/// The house fixture without its response column
pub fn create_house_features(rows: usize) -> DataFrame {
    create_house_dataframe(rows).drop("SalePrice").unwrap()
}

/// Small table for the end-to-end scenario: one ordinal, one numeric with a gap,
/// one categorical with a singleton category
pub fn create_scenario_dataframe() -> DataFrame {
    df! {
        "Quality" => ["Po", "TA", "Gd", "TA", "Ex"],
        "Area" => [Some(100.0f64), None, Some(300.0), Some(200.0), Some(400.0)],
        "RareCat" => ["A", "A", "A", "A", "B"],
    }
    .unwrap()
}

/// Config routing the scenario table, with scaling and power disabled
pub fn scenario_config() -> PipelineConfig {
    PipelineConfig {
        drop_columns: Vec::new(),
        redundant_threshold: 1.0,
        redundant_additional: Vec::new(),
        rare_threshold: 0.25,
        numeric_columns: vec!["Area".into()],
        categorical_columns: vec!["RareCat".into()],
        ordinal_columns: vec!["Quality".into()],
        ordinal_ordering: ["Po", "Fa", "TA", "Gd", "Ex"].iter().map(|s| s.to_string()).collect(),
        numeric: NumericBranch {
            scale: false,
            power: false,
        },
        ..PipelineConfig::default()
    }
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Column values as owned strings, nulls as `None`
pub fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}
