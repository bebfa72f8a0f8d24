//! Error types for the preprocessing pipeline.
//!
//! Every stage returns `PipelineError` unchanged to its caller; the composer
//! does not wrap or translate stage errors.

use thiserror::Error;

/// Errors raised while fitting or applying pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `transform` was called on a stage that has never been fit.
    #[error("Stage '{stage}' has not been fit; call fit before transform")]
    NotFitted {
        /// Name of the stage
        stage: String,
    },

    /// Strict column resolution found requested columns absent from the input.
    #[error("Stage '{stage}' requested columns not present in the input: {missing:?}")]
    ColumnsNotFound {
        /// Name of the stage
        stage: String,
        /// Requested column names that were not found
        missing: Vec<String>,
    },

    /// A column learned during fit is absent at transform time.
    #[error("Stage '{stage}' expected column '{column}' which is absent from the input")]
    MissingColumn {
        /// Name of the stage
        stage: String,
        /// Name of the absent column
        column: String,
    },

    /// A hyperparameter or configuration value is invalid.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A fixed-vocabulary encoder received a category it never saw during fit.
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory {
        /// Column holding the value
        column: String,
        /// The unseen value
        value: String,
    },

    /// A column routed to the numeric matrix cannot be represented as numbers.
    #[error("Column '{column}' has non-numeric type {dtype} and cannot be passed through")]
    NonNumericColumn {
        /// Column name
        column: String,
        /// Polars dtype, rendered
        dtype: String,
    },

    /// The final matrix would contain missing values.
    #[error("Column '{column}' still contains missing values after preprocessing")]
    MissingValues {
        /// Column name
        column: String,
    },

    /// Row or column counts do not line up.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Description of the expected shape
        expected: String,
        /// Description of the actual shape
        actual: String,
    },

    /// The input table has no rows to learn from.
    #[error("Cannot fit on an empty table")]
    EmptyInput,

    /// Wraps errors from polars.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Wraps errors from serde_json.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Wraps underlying I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn not_fitted(stage: &str) -> Self {
        Self::NotFitted {
            stage: stage.to_string(),
        }
    }

    pub(crate) fn missing_column(stage: &str, column: &str) -> Self {
        Self::MissingColumn {
            stage: stage.to_string(),
            column: column.to_string(),
        }
    }
}

/// Result alias used throughout the pipeline.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_fitted_message_names_stage() {
        let err = PipelineError::not_fitted("remove_redundant_columns");
        let msg = err.to_string();
        assert!(msg.contains("remove_redundant_columns"));
        assert!(msg.contains("has not been fit"));
    }

    #[test]
    fn test_columns_not_found_lists_columns() {
        let err = PipelineError::ColumnsNotFound {
            stage: "replace_rare".into(),
            missing: vec!["Alley".into(), "Fence".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Alley"));
        assert!(msg.contains("Fence"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no artifact");
        let err: PipelineError = io_err.into();
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("no artifact"));
    }

    #[test]
    fn test_polars_error_conversion() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("LotArea".into());
        let err: PipelineError = polars_err.into();
        assert!(err.to_string().contains("Polars error:"));
        assert!(err.to_string().contains("LotArea"));
    }
}
