//! Tests for the redundant-columns pruner

use housefit::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_near_constant_and_additional_dropped() {
    let df = df! {
        "constant" => ["AllPub"; 10],
        "nine_of_ten" => ["a", "a", "a", "a", "a", "a", "a", "a", "a", "b"],
        "varied" => [1i32, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "GarageYrBlt" => [2000i32, 2001, 2002, 2003, 2004, 2005, 2006, 2007, 2008, 2009],
    }
    .unwrap();

    let pruner = RedundantColumnsPruner::new(0.9, vec!["GarageYrBlt".into(), "Exterior2nd".into()]);
    let fitted = pruner.fit(&df).unwrap();

    // 0.9 is not strictly above the threshold
    assert_eq!(fitted.columns_to_remove, vec!["constant".to_string()]);

    let out = fitted.transform(&df).unwrap();
    assert_has_columns(&out, &["nine_of_ten", "varied"]);
    assert_missing_columns(&out, &["constant", "GarageYrBlt"]);
}

#[test]
fn test_share_ignores_missing_cells() {
    let df = df! {
        "mostly_null" => [Some("a"), Some("b"), None, None, None, None, None, None, None, None],
    }
    .unwrap();
    let fitted = RedundantColumnsPruner::default().fit(&df).unwrap();
    assert!(fitted.columns_to_remove.is_empty());
}

#[test]
fn test_all_missing_column_not_recorded() {
    let df = df! {
        "empty" => [None::<&str>, None, None],
        "x" => [1i32, 2, 3],
    }
    .unwrap();
    let fitted = RedundantColumnsPruner::default().fit(&df).unwrap();
    assert!(fitted.columns_to_remove.is_empty());
}

#[test]
fn test_unfitted_stage_is_not_fitted_error() {
    let df = create_house_dataframe(20);
    let stage = Stage::new(RedundantColumnsPruner::default());
    assert!(!stage.is_fitted());

    let err = stage.transform(&df).unwrap_err();
    assert!(matches!(err, PipelineError::NotFitted { .. }));
    assert!(err.to_string().contains("remove_redundant_columns"));
}

#[test]
fn test_stage_transform_after_fit() {
    let df = create_house_dataframe(20);
    let mut stage = Stage::new(RedundantColumnsPruner::default());
    stage.fit(&df).unwrap();
    let out = stage.transform(&df).unwrap();
    assert_missing_columns(&out, &["Utilities"]);
    assert_has_columns(&out, &["Street", "Neighborhood"]);
}
