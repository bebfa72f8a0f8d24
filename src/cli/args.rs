//! Command-line argument definitions using clap

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::model::lasso::{DEFAULT_ALPHA, DEFAULT_MAX_ITER, DEFAULT_TOL};
use crate::model::split::DEFAULT_SPLIT_SEED;
use crate::pipeline::{PipelineConfig, Resolution, DEFAULT_INFER_SCHEMA_LENGTH, TARGET_COLUMN};

/// housefit - Learned preprocessing and Lasso training for house-price data
#[derive(Parser, Debug)]
#[command(name = "housefit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    /// HOUSEFIT_LOG overrides this with an explicit filter.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the table steps on a dataset and write the cleaned table
    Preprocess {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Output file path (CSV or Parquet, determined by extension).
        /// Defaults to the input directory with a '_preprocessed' suffix.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the fitted pipeline state as JSON to this path
        #[arg(long)]
        state: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Split, fit the pipeline and a Lasso, evaluate and save the model artifact
    Train {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Directory receiving lasso_<version>.json
        #[arg(long, default_value = "models")]
        model_dir: PathBuf,

        /// Response column
        #[arg(short, long, default_value = TARGET_COLUMN)]
        target: String,

        /// Columns removed before splitting (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "Id")]
        drop: Vec<String>,

        /// L1 regularization strength of the Lasso
        #[arg(long, default_value_t = DEFAULT_ALPHA)]
        alpha: f64,

        /// Fraction of rows used for training
        #[arg(long, default_value = "0.8", value_parser = validate_train_size)]
        train_size: f64,

        /// Seed of the train/test shuffle
        #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
        split_seed: u64,

        /// Maximum coordinate descent sweeps
        #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
        max_iter: usize,

        /// Convergence tolerance on the largest coefficient change
        #[arg(long, default_value_t = DEFAULT_TOL)]
        tol: f64,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Predict with a saved model artifact
    Predict {
        /// Model artifact (lasso_<version>.json)
        #[arg(short, long)]
        model: PathBuf,

        /// Rows to score: a JSON array of records, or a CSV/Parquet file
        input: PathBuf,

        /// Write the prediction JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of rows to use for schema inference (CSV only, 0 = full scan)
        #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
        infer_schema_length: usize,
    },
}

/// Pipeline configuration flags shared by `preprocess` and `train`
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// JSON file overriding the default pipeline configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drop columns whose missing ratio is above this value
    #[arg(long, value_parser = validate_ratio)]
    pub missing_threshold: Option<f64>,

    /// Drop columns whose dominant value share is above this value
    #[arg(long, value_parser = validate_ratio)]
    pub redundant_threshold: Option<f64>,

    /// Categories below this relative frequency are replaced by the rare keyword
    #[arg(long, value_parser = validate_ratio)]
    pub rare_threshold: Option<f64>,

    /// Skip standard scaling in the numeric branch
    #[arg(long, default_value = "false")]
    pub no_scale: bool,

    /// Skip the Yeo-Johnson transform in the numeric branch
    #[arg(long, default_value = "false")]
    pub no_power: bool,

    /// Fail when configured columns are absent instead of skipping them
    #[arg(long, default_value = "false")]
    pub strict: bool,

    /// Number of rows to use for schema inference (CSV only, 0 = full scan)
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,
}

impl PipelineArgs {
    /// Defaults, then the config file, then individual flags.
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(t) = self.missing_threshold {
            config.missing_threshold = t;
        }
        if let Some(t) = self.redundant_threshold {
            config.redundant_threshold = t;
        }
        if let Some(t) = self.rare_threshold {
            config.rare_threshold = t;
        }
        if self.no_scale {
            config.numeric.scale = false;
        }
        if self.no_power {
            config.numeric.power = false;
        }
        if self.strict {
            config.resolution = Resolution::Strict;
        }
        config.validate().context("Invalid pipeline configuration")?;
        Ok(config)
    }
}

/// Default output path: the input directory with a '_preprocessed' suffix.
pub fn preprocessed_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("parquet");
    parent.join(format!("{}_preprocessed.{}", stem, extension))
}

/// Validator for threshold parameters
fn validate_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("threshold must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for train_size parameter
fn validate_train_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "train_size must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}
