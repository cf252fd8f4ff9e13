//! Crop classification from one scalar.

use std::collections::BTreeMap;

use agriq_hal::Backend;
use serde::Serialize;
use tracing::{debug, info};

use crate::circuits::{CLASS_KEY, bind_feature, crop_template};
use crate::config::CropConfig;
use crate::error::PipelineResult;
use crate::reduction::LabelReduction;

/// Outcome of the crop pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropReport {
    pub value: f64,
    pub shots: u32,
    /// Mean of bit 0 of `m`.
    pub predicted_class: f64,
    pub distribution: BTreeMap<String, f64>,
}

impl std::fmt::Display for CropReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Predicted Class: {}", self.predicted_class)
    }
}

/// Run the two-qubit crop circuit and average bit 0.
pub async fn run(backend: &dyn Backend, config: &CropConfig) -> PipelineResult<CropReport> {
    info!(value = config.value, shots = config.shots, "running crop pipeline");

    let circuit = bind_feature(&crop_template(config.encoding)?, config.value)?;
    let result = backend.run(&circuit, config.shots).await?;
    debug!(counts = ?result.counts.sorted(), "crop counts");

    let predicted_class = LabelReduction::MeanOfBit.reduce_scalar(&result, CLASS_KEY)?;
    Ok(CropReport {
        value: config.value,
        shots: config.shots,
        predicted_class,
        distribution: result.counts.probabilities(),
    })
}
