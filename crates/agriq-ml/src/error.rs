//! Error types for the classical model.

use thiserror::Error;

/// Errors raised while scaling data or training the model.
#[derive(Debug, Error)]
pub enum MlError {
    /// Inputs disagree on a dimension.
    #[error("Shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which dimension disagreed.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// No rows to fit on.
    #[error("Empty data set")]
    EmptyData,

    /// A training label is outside `[0, 1]`.
    #[error("Label {0} at row {1} is outside [0, 1]")]
    InvalidLabel(f64, usize),

    /// A feature is NaN or infinite.
    #[error("Non-finite feature at row {row}, column {col}")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// Bad hyperparameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for model operations.
pub type MlResult<T> = Result<T, MlError>;
