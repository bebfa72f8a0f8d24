//! Training entry point: split, fit the pipeline and target transform, fit the Lasso

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::artifact::{ModelArtifact, MODEL_VERSION};
use super::lasso::{Lasso, Regressor, DEFAULT_ALPHA, DEFAULT_MAX_ITER, DEFAULT_TOL};
use super::metrics::RegressionMetrics;
use super::predict::predict;
use super::split::{split_dataset, DEFAULT_SPLIT_SEED, DEFAULT_TRAIN_SIZE};
use super::target::TargetTransform;
use crate::pipeline::{PipelineConfig, PreprocessPipeline, TARGET_COLUMN};

/// Options of a training run that are not part of the preprocessing config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    pub target: String,
    /// Columns removed before the split
    pub drop: Vec<String>,
    pub train_size: f64,
    pub split_seed: u64,
    pub alpha: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            target: TARGET_COLUMN.to_string(),
            drop: vec!["Id".to_string()],
            train_size: DEFAULT_TRAIN_SIZE,
            split_seed: DEFAULT_SPLIT_SEED,
            alpha: DEFAULT_ALPHA,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
        }
    }
}

/// Train a Lasso on `df` and return the evaluated, ready-to-save artifact.
pub fn train(df: &DataFrame, config: &PipelineConfig, options: &TrainOptions) -> Result<ModelArtifact> {
    config.validate().context("Invalid pipeline configuration")?;

    let split = split_dataset(
        df,
        &options.target,
        &options.drop,
        options.train_size,
        options.split_seed,
    )?;

    let (pipeline, x_train) = PreprocessPipeline::new(config.clone())
        .fit_transform(&split.x_train)
        .context("Failed to fit the preprocessing pipeline")?;

    let target_transform =
        TargetTransform::fit(&split.y_train).context("Failed to fit the target transform")?;

    let mut model = Lasso::new(options.alpha)
        .with_max_iter(options.max_iter)
        .with_tol(options.tol);
    model
        .fit(&x_train, &target_transform.forward(&split.y_train))
        .context("Failed to fit the lasso")?;

    tracing::info!(
        features = x_train.ncols(),
        selected = model.n_selected(),
        rows = x_train.nrows(),
        "trained lasso"
    );

    let mut artifact = ModelArtifact {
        version: MODEL_VERSION.to_string(),
        trained_at: chrono::Utc::now().to_rfc3339(),
        target: options.target.clone(),
        config: config.clone(),
        pipeline,
        target_transform,
        model,
        train_metrics: None,
        test_metrics: None,
    };

    let train_pred = predict(&artifact, &split.x_train).context("Failed to score the train set")?;
    let test_pred = predict(&artifact, &split.x_test).context("Failed to score the test set")?;
    artifact.train_metrics = Some(RegressionMetrics::evaluate(&split.y_train, &train_pred.predictions));
    artifact.test_metrics = Some(RegressionMetrics::evaluate(&split.y_test, &test_pred.predictions));

    Ok(artifact)
}
