//! Agricultural quantum-classical example pipelines.
//!
//! Three pipelines share one shape: scalar inputs become rotation angles of a
//! small circuit, the circuit is sampled on a [`agriq_hal::Backend`], and the
//! measured bits are reduced to a label.
//!
//! - [`pipelines::fertilizer`]: soil N/P/K levels to a fertilizer probability.
//! - [`pipelines::classifier`]: circuit-labelled synthetic data trains a
//!   [`agriq_ml::DenseClassifier`], then a new value is labelled.
//! - [`pipelines::crop`]: one scalar to the mean of a measured class bit.
//!
//! # Example
//!
//! ```ignore
//! use agriq_pipeline::{PipelineConfig, create_backend, pipelines};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig { seed: Some(7), ..Default::default() };
//!     let backend = create_backend(&config)?;
//!     let report = pipelines::crop::run(backend.as_ref(), &config.crop).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod circuits;
pub mod config;
pub mod data;
pub mod encoding;
pub mod error;
pub mod pipelines;
pub mod reduction;

pub use backend::{SIMULATOR, backend_registry, create_backend};
pub use config::{ClassifierConfig, CropConfig, FertilizerConfig, PipelineConfig};
pub use data::{SoilSample, synthetic_scalars};
pub use encoding::FeatureEncoding;
pub use error::{PipelineError, PipelineResult};
pub use pipelines::{ClassifierReport, CropReport, FertilizerReport, Reports, run_all};
pub use reduction::LabelReduction;
