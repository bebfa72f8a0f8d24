//! Tests for the missing-columns pruner

use housefit::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// Column with `nulls` missing cells out of `rows`
fn column_with_nulls(name: &str, rows: usize, nulls: usize) -> Column {
    let values: Vec<Option<f64>> = (0..rows)
        .map(|i| if i < nulls { None } else { Some(i as f64) })
        .collect();
    Column::new(name.into(), values)
}

#[test]
fn test_exactly_threshold_is_kept() {
    let df = DataFrame::new(vec![
        column_with_nulls("at_threshold", 5000, 4000),
        column_with_nulls("just_above", 5000, 4001),
    ])
    .unwrap();

    let fitted = MissingColumnsPruner::default().fit(&df).unwrap();
    assert_eq!(fitted.columns_to_drop, vec!["just_above".to_string()]);

    let out = fitted.transform(&df).unwrap();
    assert_has_columns(&out, &["at_threshold"]);
    assert_missing_columns(&out, &["just_above"]);
}

#[test]
fn test_all_missing_recorded_complete_never() {
    let df = df! {
        "complete" => [1.0f64, 2.0, 3.0, 4.0],
        "empty" => [None::<f64>, None, None, None],
    }
    .unwrap();

    let fitted = MissingColumnsPruner::new(0.0).fit(&df).unwrap();
    assert_eq!(fitted.columns_to_drop, vec!["empty".to_string()]);
}

#[test]
fn test_missing_ratios_reported_descending() {
    let df = df! {
        "a" => [Some(1.0f64), Some(2.0), Some(3.0), Some(4.0)],
        "b" => [None::<f64>, None, None, Some(4.0)],
        "c" => [None::<f64>, Some(2.0), Some(3.0), Some(4.0)],
    }
    .unwrap();

    let fitted = MissingColumnsPruner::default().fit(&df).unwrap();
    let names: Vec<&str> = fitted.missing_ratios.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["b", "c", "a"]);
    assert!((fitted.missing_ratios[0].1 - 0.75).abs() < 1e-12);
}

#[test]
fn test_recorded_column_absent_at_transform_is_noop() {
    let train = df! {
        "keep" => [1.0f64, 2.0],
        "gone" => [None::<f64>, None],
    }
    .unwrap();
    let fitted = MissingColumnsPruner::default().fit(&train).unwrap();

    let serve = df! { "keep" => [3.0f64] }.unwrap();
    let out = fitted.transform(&serve).unwrap();
    assert_shape(&out, 1, 1);
}

#[test]
fn test_empty_input_records_nothing() {
    let df = DataFrame::new(vec![Column::new("a".into(), Vec::<f64>::new())]).unwrap();
    let fitted = MissingColumnsPruner::default().fit(&df).unwrap();
    assert!(fitted.columns_to_drop.is_empty());
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let df = df! { "a" => [1.0f64] }.unwrap();
    assert!(matches!(
        MissingColumnsPruner::new(1.5).fit(&df),
        Err(PipelineError::InvalidParameter(_))
    ));
}
