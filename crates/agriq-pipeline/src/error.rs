//! Error types for the pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building, running or post-processing a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] agriq_ir::IrError),

    /// Backend execution failed.
    #[error("Backend error: {0}")]
    Hal(#[from] agriq_hal::HalError),

    /// Model training or prediction failed.
    #[error("Model error: {0}")]
    Ml(#[from] agriq_ml::MlError),

    /// An input sample is unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A label reduction produced nothing.
    #[error("No shots recorded for measurement key '{0}'")]
    NoShots(String),

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for [`crate::PipelineConfig`].
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
