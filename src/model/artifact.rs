//! Versioned model artifact: config, fitted pipeline, target transform and Lasso

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::lasso::Lasso;
use super::metrics::RegressionMetrics;
use super::target::TargetTransform;
use crate::pipeline::{FittedPipeline, PipelineConfig};

/// Crate version stamped into every artifact
pub const MODEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to serve predictions, persisted as one JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    /// RFC 3339 timestamp of the training run
    pub trained_at: String,
    pub target: String,
    pub config: PipelineConfig,
    pub pipeline: FittedPipeline,
    pub target_transform: TargetTransform,
    pub model: Lasso,
    pub train_metrics: Option<RegressionMetrics>,
    pub test_metrics: Option<RegressionMetrics>,
}

impl ModelArtifact {
    /// File name of the artifact for a given version.
    pub fn file_name(version: &str) -> String {
        format!("lasso_{version}.json")
    }

    /// Write the artifact into `dir` as `lasso_<version>.json`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;
        let path = dir.join(Self::file_name(&self.version));
        let json = serde_json::to_string_pretty(self).context("Failed to serialize model artifact")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write model artifact: {}", path.display()))?;
        tracing::info!(path = %path.display(), version = %self.version, "saved model artifact");
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        let artifact: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse model artifact: {}", path.display()))?;
        if artifact.version != MODEL_VERSION {
            tracing::warn!(
                artifact = %artifact.version,
                crate_version = MODEL_VERSION,
                "model artifact was produced by a different version"
            );
        }
        Ok(artifact)
    }

    /// Load the artifact of the current crate version from `dir`.
    pub fn load_current(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(Self::file_name(MODEL_VERSION)))
    }
}
