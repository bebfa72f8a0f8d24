//! Model module - regression on the preprocessed matrix, training and serving

pub mod artifact;
pub mod lasso;
pub mod metrics;
pub mod predict;
pub mod records;
pub mod split;
pub mod target;
pub mod train;

pub use artifact::{ModelArtifact, MODEL_VERSION};
pub use lasso::{Lasso, Regressor};
pub use metrics::{mae, r2_score, rmse, RegressionMetrics};
pub use predict::{predict, PredictionResult};
pub use records::{records_from_str, records_to_dataframe};
pub use split::{split_dataset, DatasetSplit};
pub use target::TargetTransform;
pub use train::{train, TrainOptions};
