//! Report module - summarizing preprocessing and training results

pub mod summary;

pub use summary::*;
