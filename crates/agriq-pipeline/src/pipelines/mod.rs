//! The three agricultural pipelines.
//!
//! Each pipeline runs once from start to finish: build circuits, execute them
//! on a [`Backend`], reduce the measured bits, and report. The reports are
//! serializable and print as the one summary line of their pipeline.

pub mod classifier;
pub mod crop;
pub mod fertilizer;

use agriq_hal::Backend;
use serde::Serialize;
use tracing::info;

pub use classifier::ClassifierReport;
pub use crop::CropReport;
pub use fertilizer::FertilizerReport;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;

/// Reports of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct Reports {
    pub fertilizer: FertilizerReport,
    pub classifier: ClassifierReport,
    pub crop: CropReport,
}

impl std::fmt::Display for Reports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.fertilizer)?;
        writeln!(f, "{}", self.classifier)?;
        write!(f, "{}", self.crop)
    }
}

/// Run fertilizer, classifier and crop in that order.
pub async fn run_all(backend: &dyn Backend, config: &PipelineConfig) -> PipelineResult<Reports> {
    config.validate()?;
    info!(backend = backend.name(), "running all pipelines");

    let fertilizer = fertilizer::run(backend, &config.fertilizer).await?;
    let classifier = classifier::run(backend, &config.classifier, config.seed).await?;
    let crop = crop::run(backend, &config.crop).await?;

    Ok(Reports {
        fertilizer,
        classifier,
        crop,
    })
}
