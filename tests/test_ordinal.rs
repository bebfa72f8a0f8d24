//! Tests for the ordinal encoder

use housefit::pipeline::*;
use polars::prelude::*;

fn quality_ordering() -> Vec<String> {
    ["Po", "Fa", "TA", "Gd", "Ex"].iter().map(|s| s.to_string()).collect()
}

fn ranks(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name).unwrap().i64().unwrap().into_iter().collect()
}

#[test]
fn test_ranks_follow_shared_ordering() {
    let df = df! {
        "ExterQual" => ["TA", "Gd", "Ex"],
        "KitchenQual" => ["Po", "Fa", "TA"],
    }
    .unwrap();
    let encoder = OrdinalEncoder::new(None, OrdinalCategories::Shared(quality_ordering()));
    let (_, out) = encoder.fit_transform(&df).unwrap();

    assert_eq!(ranks(&out, "ExterQual"), vec![Some(2), Some(3), Some(4)]);
    assert_eq!(ranks(&out, "KitchenQual"), vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_unknown_and_missing_map_to_reserved_rank() {
    let train = df! { "BsmtQual" => ["TA", "Gd"] }.unwrap();
    let fitted = OrdinalEncoder::new(None, OrdinalCategories::Shared(quality_ordering()))
        .fit(&train)
        .unwrap();

    let serve = df! { "BsmtQual" => [Some("Excellent"), None, Some("Gd")] }.unwrap();
    let out = fitted.transform(&serve).unwrap();
    let encoded = ranks(&out, "BsmtQual");
    assert_eq!(encoded, vec![Some(-1), Some(-1), Some(3)]);

    // The reserved rank never collides with a real one
    let real: Vec<i64> = (0..quality_ordering().len() as i64).collect();
    assert!(!real.contains(&fitted.unknown_value));
}

#[test]
fn test_per_column_orderings() {
    let df = df! {
        "Fence" => ["MnWw", "GdPrv"],
        "ExterQual" => ["Gd", "TA"],
    }
    .unwrap();
    let encoder = OrdinalEncoder::new(
        None,
        OrdinalCategories::PerColumn(vec![
            vec!["MnWw".into(), "GdWo".into(), "MnPrv".into(), "GdPrv".into()],
            quality_ordering(),
        ]),
    );
    let (_, out) = encoder.fit_transform(&df).unwrap();
    assert_eq!(ranks(&out, "Fence"), vec![Some(0), Some(3)]);
    assert_eq!(ranks(&out, "ExterQual"), vec![Some(3), Some(2)]);
}

#[test]
fn test_ordering_count_mismatch_rejected() {
    let df = df! { "a" => ["x"], "b" => ["y"] }.unwrap();
    let encoder = OrdinalEncoder::new(None, OrdinalCategories::PerColumn(vec![vec!["x".into()]]));
    assert!(matches!(encoder.fit(&df), Err(PipelineError::InvalidParameter(_))));
}

#[test]
fn test_duplicate_labels_rejected() {
    let df = df! { "a" => ["x"] }.unwrap();
    let encoder = OrdinalEncoder::new(
        None,
        OrdinalCategories::Shared(vec!["x".into(), "y".into(), "x".into()]),
    );
    assert!(matches!(encoder.fit(&df), Err(PipelineError::InvalidParameter(_))));
}

#[test]
fn test_colliding_unknown_value_rejected() {
    let df = df! { "a" => ["x"] }.unwrap();
    let encoder = OrdinalEncoder::new(None, OrdinalCategories::Shared(quality_ordering()))
        .with_unknown_value(2);
    assert!(matches!(encoder.fit(&df), Err(PipelineError::InvalidParameter(_))));

    let encoder = OrdinalEncoder::new(None, OrdinalCategories::Shared(quality_ordering()))
        .with_unknown_value(5);
    assert!(encoder.fit(&df).is_ok());
}
