//! Unit tests for dataset loader

use housefit::pipeline::{dataset_stats, load_dataset, save_dataset, split_target};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_with_na_marker() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("train.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "Id,LotFrontage,Alley,SalePrice").unwrap();
    writeln!(file, "1,65,NA,208500").unwrap();
    writeln!(file, "2,NA,Grvl,181500").unwrap();
    writeln!(file, "3,68,Pave,223500").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_shape(&df, 3, 4);
    assert_eq!(df.get_column_names(), &["Id", "LotFrontage", "Alley", "SalePrice"]);
    assert_eq!(df.column("LotFrontage").unwrap().null_count(), 1);
    assert!(df.column("LotFrontage").unwrap().dtype().is_primitive_numeric());
    assert_eq!(df.column("Alley").unwrap().null_count(), 1);
}

#[test]
fn test_full_scan_schema_inference() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("late_float.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "x").unwrap();
    for i in 0..50 {
        writeln!(file, "{}", i).unwrap();
    }
    writeln!(file, "1.5").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 0).unwrap();
    assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
}

#[test]
fn test_parquet_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("houses.parquet");

    let mut df = create_house_dataframe(20);
    save_dataset(&mut df, &path).unwrap();
    let loaded = load_dataset(&path, 100).unwrap();

    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_csv_round_trip_keeps_shape() {
    let mut df = create_house_dataframe(20);
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);
    let loaded = load_dataset(&csv_path, 100).unwrap();
    assert_shape(&loaded, 20, df.width());
    assert_eq!(loaded.column("LotFrontage").unwrap().null_count(), 4);
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, "x").unwrap();

    let err = load_dataset(&path, 100).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));

    let mut df = create_house_dataframe(20);
    assert!(save_dataset(&mut df, &path).is_err());
}

#[test]
fn test_split_target() {
    let df = create_house_dataframe(20);
    let (features, target) = split_target(&df, "SalePrice").unwrap();

    assert_eq!(target.len(), 20);
    assert_missing_columns(&features, &["SalePrice"]);
    assert_eq!(features.width(), df.width() - 1);

    assert!(split_target(&df, "Price").is_err());
}

#[test]
fn test_split_target_rejects_missing_response() {
    let df = df! { "SalePrice" => [Some(1.0f64), None] }.unwrap();
    let err = split_target(&df, "SalePrice").unwrap_err();
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_dataset_stats() {
    let df = create_house_dataframe(20);
    let (rows, cols, memory_mb) = dataset_stats(&df);
    assert_eq!(rows, 20);
    assert_eq!(cols, 13);
    assert!(memory_mb > 0.0);
}
