//! Serving path: replay the fitted pipeline and predict

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::artifact::ModelArtifact;
use super::lasso::Regressor;
use crate::pipeline::PipelineResult;

/// Predictions on the original target scale, tagged with the model version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictions: Vec<f64>,
    pub version: String,
}

/// Predict with a trained artifact. Only applies learned state; nothing is refit.
pub fn predict(artifact: &ModelArtifact, table: &DataFrame) -> PipelineResult<PredictionResult> {
    tracing::info!(version = %artifact.version, rows = table.height(), "making predictions");
    let matrix = artifact.pipeline.transform(table)?;
    let transformed = artifact.model.predict(&matrix)?;
    Ok(PredictionResult {
        predictions: artifact.target_transform.inverse(&transformed),
        version: artifact.version.clone(),
    })
}
