//! End-to-end pipeline runs on a seeded simulator.

use agriq_adapter_sim::SimulatorBackend;
use agriq_hal::{Backend, HalError};
use agriq_pipeline::circuits::{CLASS_KEY, classifier_circuit, crop_circuit};
use agriq_pipeline::pipelines::{classifier, crop, fertilizer};
use agriq_pipeline::{
    ClassifierConfig, CropConfig, FertilizerConfig, LabelReduction, PipelineConfig, PipelineError,
    SoilSample, run_all,
};

fn seeded(seed: u64) -> SimulatorBackend {
    SimulatorBackend::new().with_seed(seed)
}

#[tokio::test]
async fn test_crop_bits_agree_at_zero() {
    let backend = seeded(1);
    let result = backend.run(&crop_circuit(0.0).unwrap(), 200).await.unwrap();
    let shots = result.measurements.bits(CLASS_KEY).unwrap();
    assert_eq!(shots.len(), 200);
    assert!(shots.iter().all(|bits| bits[0] == bits[1]));
}

#[tokio::test]
async fn test_crop_report() {
    let backend = seeded(2);
    let config = CropConfig {
        shots: 2000,
        ..CropConfig::default()
    };
    let report = crop::run(&backend, &config).await.unwrap();
    assert!((0.0..=1.0).contains(&report.predicted_class));
    // H on q0 fixes its marginal regardless of the angle on q1.
    assert!((report.predicted_class - 0.5).abs() < 0.05);
    assert!(report.to_string().starts_with("Predicted Class: "));
}

#[tokio::test]
async fn test_classifier_circuit_is_balanced_at_zero() {
    let backend = seeded(3);
    let result = backend
        .run(&classifier_circuit(0.0).unwrap(), 4000)
        .await
        .unwrap();
    let mean = LabelReduction::MeanOfBit
        .reduce_scalar(&result, CLASS_KEY)
        .unwrap();
    assert!((mean - 0.5).abs() < 0.05, "mean {mean}");
}

#[tokio::test]
async fn test_per_shot_labels() {
    let backend = seeded(4);
    let result = backend
        .run(&classifier_circuit(0.3).unwrap(), 25)
        .await
        .unwrap();
    let labels = LabelReduction::PerShotBit.reduce(&result, CLASS_KEY).unwrap();
    assert_eq!(labels.len(), 25);
    assert!(labels.iter().all(|&l| l == 0.0 || l == 1.0));
}

#[tokio::test]
async fn test_fertilizer_probability() {
    let backend = seeded(5);
    let config = FertilizerConfig {
        shots: 4000,
        ..FertilizerConfig::default()
    };
    let report = fertilizer::run(&backend, &config).await.unwrap();

    // P(q0 = 1) = (1 - sin(N)) / 2 for the default sample.
    let expected = (1.0 - 0.2f64.sin()) / 2.0;
    assert!((report.probability - expected).abs() < 0.05);
    assert!(!report.recommend);
    assert!(report.distribution.keys().all(|k| k == "0" || k == "1"));
    assert!(
        report
            .to_string()
            .starts_with("Recommended fertilizer amount: ")
    );
}

#[tokio::test]
async fn test_fertilizer_rejects_nan() {
    let backend = seeded(6);
    let config = FertilizerConfig {
        sample: SoilSample::new(0.2, f64::NAN, 0.8),
        ..FertilizerConfig::default()
    };
    let err = fertilizer::run(&backend, &config).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
}

#[tokio::test]
async fn test_zero_shots_rejected() {
    let backend = seeded(7);
    let config = CropConfig {
        shots: 0,
        ..CropConfig::default()
    };
    let err = crop::run(&backend, &config).await.unwrap_err();
    assert!(matches!(err, PipelineError::Hal(HalError::InvalidShots(_))));
}

#[tokio::test]
async fn test_classifier_run() {
    let backend = seeded(8);
    let config = ClassifierConfig::default();
    let report = classifier::run(&backend, &config, Some(8)).await.unwrap();

    assert_eq!(report.training_rows, 100);
    assert_eq!(report.history.epochs(), 10);
    assert!(report.label <= 1);
    assert!((0.0..=1.0).contains(&report.model_probability));
    assert!((0.0..=1.0).contains(&report.positive_rate));
    assert_eq!(
        report.to_string(),
        format!("Predicted label for new data: {}", report.label)
    );
}

#[tokio::test]
async fn test_classifier_is_reproducible() {
    let config = ClassifierConfig {
        samples: 4,
        shots: 5,
        ..ClassifierConfig::default()
    };
    let a = classifier::run(&seeded(9), &config, Some(9)).await.unwrap();
    let b = classifier::run(&seeded(9), &config, Some(9)).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_classifier_without_samples() {
    let config = ClassifierConfig {
        samples: 0,
        ..ClassifierConfig::default()
    };
    let err = classifier::run(&seeded(10), &config, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
}

#[tokio::test]
async fn test_run_all() {
    let config = PipelineConfig {
        seed: Some(11),
        ..PipelineConfig::default()
    };
    let backend = agriq_pipeline::create_backend(&config).unwrap();
    let reports = run_all(backend.as_ref(), &config).await.unwrap();

    let text = reports.to_string();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Recommended fertilizer amount"));
    assert!(lines[1].starts_with("Predicted label for new data"));
    assert!(lines[2].starts_with("Predicted Class"));

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json["crop"]["shots"], 100);
}
