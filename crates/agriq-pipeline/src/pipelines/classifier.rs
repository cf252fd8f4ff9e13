//! Circuit-labelled training of a dense classifier.
//!
//! Synthetic scalars are scaled to `[-1, 1]` and each one is run through the
//! classifier circuit. Every shot's bit 0 becomes a training label for that
//! scalar, so `samples * shots` rows reach the model. A new value is then
//! labelled by the first shot of its own circuit, and also scored by the
//! trained model.

use std::collections::BTreeMap;

use agriq_hal::Backend;
use agriq_ml::{DenseClassifier, FitConfig, TrainingHistory, scale_symmetric};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::circuits::{CLASS_KEY, bind_feature, classifier_template};
use crate::config::ClassifierConfig;
use crate::data::synthetic_scalars;
use crate::error::{PipelineError, PipelineResult};
use crate::reduction::LabelReduction;

/// Outcome of the classifier pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierReport {
    pub samples: usize,
    pub shots: u32,
    /// Rows the model was fit on.
    pub training_rows: usize,
    /// Fraction of training labels equal to 1.
    pub positive_rate: f64,
    pub history: TrainingHistory,
    pub new_value: f64,
    /// Bit 0 of the first shot for `new_value`.
    pub label: u8,
    /// Model probability for the scaled `new_value`.
    pub model_probability: f64,
    pub model_label: u8,
    /// Outcome frequencies for `new_value`.
    pub distribution: BTreeMap<String, f64>,
}

impl std::fmt::Display for ClassifierReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Predicted label for new data: {}", self.label)
    }
}

/// Generate data, label it on `backend`, train, and classify `new_value`.
///
/// `seed` fixes the synthetic data, the model initialisation and the batch
/// order. The backend carries its own seed.
pub async fn run(
    backend: &dyn Backend,
    config: &ClassifierConfig,
    seed: Option<u64>,
) -> PipelineResult<ClassifierReport> {
    if config.samples == 0 {
        return Err(PipelineError::InvalidInput("no training samples".into()));
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        samples = config.samples,
        shots = config.shots,
        "running classifier pipeline"
    );

    let scaled: Vec<f64> = synthetic_scalars(config.samples, &mut rng)
        .into_iter()
        .map(scale_symmetric)
        .collect();

    let template = classifier_template(config.encoding)?;
    let circuits = scaled
        .iter()
        .map(|&x| bind_feature(&template, x))
        .collect::<PipelineResult<Vec<_>>>()?;
    let results = backend.run_batch(&circuits, config.shots).await?;

    let mut features = Vec::new();
    let mut labels = Vec::new();
    for (&x, result) in scaled.iter().zip(&results) {
        for label in LabelReduction::PerShotBit.reduce(result, CLASS_KEY)? {
            features.push(x);
            labels.push(label);
        }
    }
    let rows = features.len();
    let positive_rate = labels.iter().sum::<f64>() / rows as f64;
    debug!(rows, positive_rate, "training set labelled");

    let x = Array2::from_shape_fn((rows, 1), |(i, _)| features[i]);
    let y = Array1::from(labels);
    let mut model = DenseClassifier::with_rng(1, &mut rng);
    let fit_config = FitConfig::default()
        .with_epochs(config.epochs)
        .with_batch_size(config.batch_size)
        .with_learning_rate(config.learning_rate)
        .with_seed(rng.r#gen());
    let history = model.fit(x.view(), y.view(), &fit_config)?;
    debug!(final_loss = ?history.final_loss(), "model trained");

    let circuit = bind_feature(&template, config.new_value)?;
    let result = backend.run(&circuit, config.shots).await?;
    let label = LabelReduction::FirstShotBit.reduce_scalar(&result, CLASS_KEY)?;

    let query = Array2::from_elem((1, 1), scale_symmetric(config.new_value));
    let model_probability = model.predict_proba(query.view())?[0];

    Ok(ClassifierReport {
        samples: config.samples,
        shots: config.shots,
        training_rows: rows,
        positive_rate,
        history,
        new_value: config.new_value,
        label: u8::from(label >= 1.0),
        model_probability,
        model_label: u8::from(model_probability >= 0.5),
        distribution: result.counts.probabilities(),
    })
}
