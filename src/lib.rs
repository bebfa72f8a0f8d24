//! housefit: learned tabular preprocessing for house-price regression
//!
//! The pipeline learns its statistics once (imputation values, rare categories,
//! pruned columns, ordinal ranks, scaling and power parameters) and replays them
//! unchanged on every later table, so training and serving see identical features.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;
