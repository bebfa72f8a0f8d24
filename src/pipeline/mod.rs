//! Pipeline module - learned, replayable preprocessing stages

pub mod composer;
pub mod config;
pub mod drop;
pub mod error;
pub mod frame;
pub mod impute;
pub mod loader;
pub mod matrix;
pub mod missing;
pub mod numeric;
pub mod onehot;
pub mod ordinal;
pub mod rare;
pub mod redundant;
pub mod resolution;
pub mod router;
pub mod subset;
pub mod transformer;

pub use composer::{FittedPipeline, FittedTableStep, PreprocessPipeline, TableStep};
pub use config::{PipelineConfig, TARGET_COLUMN};
pub use drop::DropColumns;
pub use error::{PipelineError, PipelineResult};
pub use impute::{ConstantImputer, FittedConstantImputer, FittedMeanImputer, MeanImputer};
pub use loader::*;
pub use matrix::FeatureMatrix;
pub use missing::*;
pub use numeric::{
    FittedStandardScaler, FittedYeoJohnson, PowerParams, ScaleParams, StandardScaler, YeoJohnson,
};
pub use onehot::{FittedOneHotEncoder, OneHotEncoder};
pub use ordinal::{FittedOrdinalEncoder, OrdinalCategories, OrdinalEncoder};
pub use rare::{FittedRareCategories, RareCategoryReplacer};
pub use redundant::{FittedRedundantColumns, RedundantColumnsPruner};
pub use resolution::{ColumnResolution, Resolution};
pub use router::{ColumnRouter, FittedColumnRouter, NumericBranch};
pub use subset::{ColumnSubset, FittedColumnSubset};
pub use transformer::{FittedTransformer, Stage, Transformer};
