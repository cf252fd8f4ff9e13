//! Backend abstraction for agriq.
//!
//! Circuits built with `agriq-ir` are executed through the [`Backend`]
//! trait. A backend reports its [`Capabilities`], accepts jobs and returns an
//! [`ExecutionResult`] holding both the aggregated [`Counts`] histogram and
//! the per-shot [`Measurements`] of every named register.
//!
//! # Example
//!
//! ```ignore
//! use agriq_hal::Backend;
//! use agriq_adapter_sim::SimulatorBackend;
//! use agriq_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::bell()?;
//!     let backend = SimulatorBackend::new().with_seed(7);
//!
//!     let result = backend.run(&circuit, 1000).await?;
//!     if let Some((bits, count)) = result.counts.most_frequent() {
//!         println!("Most frequent: {bits} ({count} times)");
//!     }
//!     println!("P(m[0] = 1) = {}", result.measurements.mean("m", 0)?);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult, Measurements};
