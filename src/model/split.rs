//! Seeded train/test split

use anyhow::{Context, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::pipeline::frame::drop_existing;
use crate::pipeline::loader::split_target;

pub const DEFAULT_TRAIN_SIZE: f64 = 0.8;
pub const DEFAULT_SPLIT_SEED: u64 = 1;

/// Features and response of the train and test partitions.
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

/// Shuffled row indices split into train and test parts.
pub fn split_indices(n_rows: usize, train_size: f64, seed: u64) -> Result<(Vec<IdxSize>, Vec<IdxSize>)> {
    if !(train_size > 0.0 && train_size < 1.0) {
        anyhow::bail!("train_size must be strictly between 0 and 1, got {}", train_size);
    }
    let n_train = (n_rows as f64 * train_size).floor() as usize;
    if n_train == 0 || n_train == n_rows {
        anyhow::bail!(
            "train_size {} leaves an empty partition for {} rows",
            train_size,
            n_rows
        );
    }

    let mut indices: Vec<IdxSize> = (0..n_rows as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let test = indices.split_off(n_train);
    Ok((indices, test))
}

/// Separate the target, drop `drop` columns and split the rows.
pub fn split_dataset(
    df: &DataFrame,
    target: &str,
    drop: &[String],
    train_size: f64,
    seed: u64,
) -> Result<DatasetSplit> {
    let (features, y) = split_target(df, target)?;
    let features = drop_existing(&features, drop);
    let (train_idx, test_idx) = split_indices(df.height(), train_size, seed)?;

    let take_rows = |idx: &[IdxSize]| -> Result<DataFrame> {
        let idx = IdxCa::from_vec("idx".into(), idx.to_vec());
        features.take(&idx).context("Failed to select split rows")
    };
    let pick = |idx: &[IdxSize]| idx.iter().map(|&i| y[i as usize]).collect::<Vec<f64>>();

    tracing::debug!(
        train = train_idx.len(),
        test = test_idx.len(),
        seed,
        "split dataset"
    );

    Ok(DatasetSplit {
        x_train: take_rows(&train_idx)?,
        x_test: take_rows(&test_idx)?,
        y_train: pick(&train_idx),
        y_test: pick(&test_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_seeded_and_complete() {
        let (a_train, a_test) = split_indices(10, 0.8, 7).unwrap();
        let (b_train, b_test) = split_indices(10, 0.8, 7).unwrap();
        assert_eq!(a_train, b_train);
        assert_eq!(a_test, b_test);
        assert_eq!(a_train.len(), 8);
        let mut all: Vec<IdxSize> = a_train.into_iter().chain(a_test).collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<IdxSize>>());
    }

    #[test]
    fn test_invalid_train_size() {
        assert!(split_indices(10, 1.0, 1).is_err());
        assert!(split_indices(1, 0.5, 1).is_err());
    }

    #[test]
    fn test_split_dataset_keeps_rows_aligned() {
        let df = df! {
            "Id" => [0i64, 1, 2, 3, 4],
            "x" => [0.0f64, 10.0, 20.0, 30.0, 40.0],
            "SalePrice" => [0.0f64, 1.0, 2.0, 3.0, 4.0],
        }
        .unwrap();
        let split = split_dataset(&df, "SalePrice", &["Id".to_string()], 0.6, 3).unwrap();
        assert!(split.x_train.column("Id").is_err());
        assert!(split.x_train.column("SalePrice").is_err());
        let x: Vec<f64> = split.x_train.column("x").unwrap().f64().unwrap().into_no_null_iter().collect();
        for (xi, yi) in x.iter().zip(&split.y_train) {
            assert_eq!(*xi, yi * 10.0);
        }
        assert_eq!(split.y_test.len(), 2);
    }
}
