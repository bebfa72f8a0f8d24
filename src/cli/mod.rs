//! CLI module - argument parsing and command handlers

pub mod args;
pub mod predict;
pub mod preprocess;
pub mod train;

pub use args::{Cli, Commands, PipelineArgs};
pub use predict::run_predict;
pub use preprocess::run_preprocess;
pub use train::run_train;
