//! Fertilizer recommendation from one soil sample.

use std::collections::BTreeMap;

use agriq_hal::Backend;
use serde::Serialize;
use tracing::{debug, info};

use crate::circuits::{FERTILIZER_KEY, bind, fertilizer_template};
use crate::config::FertilizerConfig;
use crate::data::SoilSample;
use crate::error::PipelineResult;
use crate::reduction::LabelReduction;

/// Outcome of the fertilizer pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerReport {
    pub sample: SoilSample,
    pub shots: u32,
    /// Fraction of shots reading 1 on the fertilizer qubit.
    pub probability: f64,
    /// Majority vote over shots.
    pub recommend: bool,
    /// Outcome frequencies of the measured key.
    pub distribution: BTreeMap<String, f64>,
}

impl std::fmt::Display for FertilizerReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Recommended fertilizer amount: {:.3}", self.probability)
    }
}

/// Encode the sample, run it, and read the fertilizer qubit.
pub async fn run(backend: &dyn Backend, config: &FertilizerConfig) -> PipelineResult<FertilizerReport> {
    let sample = config.sample;
    sample.validate()?;
    info!(%sample, shots = config.shots, "running fertilizer pipeline");

    let circuit = bind(
        &fertilizer_template(config.encoding)?,
        &[
            ("nitrogen", sample.nitrogen),
            ("phosphorus", sample.phosphorus),
            ("potassium", sample.potassium),
        ],
    )?;
    let result = backend.run(&circuit, config.shots).await?;
    debug!(counts = ?result.counts.sorted(), "fertilizer counts");

    let probability = LabelReduction::MeanOfBit.reduce_scalar(&result, FERTILIZER_KEY)?;
    let recommend = LabelReduction::Majority.reduce_scalar(&result, FERTILIZER_KEY)? >= 1.0;

    Ok(FertilizerReport {
        sample,
        shots: config.shots,
        probability,
        recommend,
        distribution: result.counts.probabilities(),
    })
}
