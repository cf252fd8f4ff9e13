//! Backend trait and configuration.
//!
//! The [`Backend`] trait covers the lifecycle of a job:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `availability()` | async | yes | `HalResult<BackendAvailability>` |
//! | `validate()` | async | yes | `HalResult<ValidationResult>` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |
//! | `run()` | async | provided | `HalResult<ExecutionResult>` |
//! | `run_batch()` | async | provided | `HalResult<Vec<ExecutionResult>>` |

use std::time::Duration;

use agriq_ir::Circuit;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings, e.g. `seed` or `max_qubits`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a configuration with no extra settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add an extra setting.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer setting.
    ///
    /// Returns `Ok(None)` when the key is absent and an error when it holds
    /// anything other than a non-negative integer.
    pub fn get_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("'{key}' must be a non-negative integer, got {value}"))
            }),
        }
    }
}

/// An execution target for circuits.
///
/// `capabilities()` is synchronous and cached at construction. `submit()`
/// returns a job in `Queued` state; `result()` is only valid once the job
/// is `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Cached capabilities.
    fn capabilities(&self) -> &Capabilities;

    /// Whether the backend currently accepts jobs.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Check a circuit against the backend's constraints.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Submit a circuit for `shots` repetitions.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Current status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Result of a finished job. Backends may forget the job once it is returned.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job that has not finished.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to finish and return its result.
    ///
    /// Polls every 50ms for up to 5 minutes.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let poll_interval = Duration::from_millis(50);
        let max_polls = 6_000;

        for _ in 0..max_polls {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }

    /// Submit a circuit and wait for its result.
    async fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let job_id = self.submit(circuit, shots).await?;
        self.wait(&job_id).await
    }

    /// Run each circuit in order with the same number of shots.
    ///
    /// Stops at the first failure.
    async fn run_batch(
        &self,
        circuits: &[Circuit],
        shots: u32,
    ) -> HalResult<Vec<ExecutionResult>> {
        debug!(backend = self.name(), circuits = circuits.len(), shots, "running batch");
        let mut results = Vec::with_capacity(circuits.len());
        for circuit in circuits {
            results.push(self.run(circuit, shots).await?);
        }
        Ok(results)
    }
}

/// Backend availability.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend accepts jobs.
    pub is_available: bool,
    /// Jobs waiting ahead of a new submission, if known.
    pub queue_depth: Option<u32>,
    /// Human-readable status.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Always available with an empty queue; typical for simulators.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }

    /// Offline for `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Outcome of [`Backend::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The circuit can be submitted.
    Valid,
    /// The circuit cannot run on this backend.
    Invalid {
        /// Why.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Whether the circuit can be submitted.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Convert into an error carrying every reason.
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => {
                Err(HalError::InvalidCircuit(reasons.join("; ")))
            }
        }
    }
}

/// Construct a backend from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Build the backend.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
