//! Feature-encoding circuit builders.
//!
//! Each builder has a symbolic template form and a concrete form. Templates
//! carry one free symbol per feature and are bound once per sample.

use std::collections::HashMap;

use agriq_ir::{Circuit, QubitId};

use crate::data::SoilSample;
use crate::encoding::FeatureEncoding;
use crate::error::{PipelineError, PipelineResult};

/// Measurement key of the fertilizer circuit.
pub const FERTILIZER_KEY: &str = "recommended_fertilizer";

/// Measurement key of the classifier and crop circuits.
pub const CLASS_KEY: &str = "m";

/// Symbol bound to the single feature of the scalar circuits.
pub const FEATURE_SYMBOL: &str = "x";

const Q0: QubitId = QubitId(0);
const Q1: QubitId = QubitId(1);

/// `Ry(N)` q0, `Rx(P)` q1, `H` q0, `CX` q0→q1, `Rx(K)` q1, `H` q1, measure q0.
pub fn fertilizer_template(encoding: FeatureEncoding) -> PipelineResult<Circuit> {
    let mut circuit = Circuit::with_size("fertilizer", 2, 0);
    circuit
        .ry(encoding.expression("nitrogen"), Q0)?
        .rx(encoding.expression("phosphorus"), Q1)?
        .h(Q0)?
        .cx(Q0, Q1)?
        .rx(encoding.expression("potassium"), Q1)?
        .h(Q1)?
        .measure_key(FERTILIZER_KEY, [Q0])?;
    Ok(circuit)
}

/// Fertilizer circuit with the sample's levels as angles.
pub fn fertilizer_circuit(sample: &SoilSample) -> PipelineResult<Circuit> {
    sample.validate()?;
    bind(
        &fertilizer_template(FeatureEncoding::Identity)?,
        &[
            ("nitrogen", sample.nitrogen),
            ("phosphorus", sample.phosphorus),
            ("potassium", sample.potassium),
        ],
    )
}

/// `H`, then `Rx(encode(x))`, measured into `m`.
pub fn classifier_template(encoding: FeatureEncoding) -> PipelineResult<Circuit> {
    let mut circuit = Circuit::with_size("classifier", 1, 0);
    circuit
        .h(Q0)?
        .rx(encoding.expression(FEATURE_SYMBOL), Q0)?
        .measure_key(CLASS_KEY, [Q0])?;
    Ok(circuit)
}

/// Classifier circuit with angle `x * pi / 2`.
pub fn classifier_circuit(x: f64) -> PipelineResult<Circuit> {
    bind_feature(&classifier_template(FeatureEncoding::HALF_PI)?, x)
}

/// `H` q0, `Rx(encode(x))` q1, `CX` q0→q1, both measured into `m`.
///
/// Bit 0 of the key is q0.
pub fn crop_template(encoding: FeatureEncoding) -> PipelineResult<Circuit> {
    let mut circuit = Circuit::with_size("crop", 2, 0);
    circuit
        .h(Q0)?
        .rx(encoding.expression(FEATURE_SYMBOL), Q1)?
        .cx(Q0, Q1)?
        .measure_key(CLASS_KEY, [Q0, Q1])?;
    Ok(circuit)
}

/// Crop circuit with angle `x`.
pub fn crop_circuit(x: f64) -> PipelineResult<Circuit> {
    bind_feature(&crop_template(FeatureEncoding::Identity)?, x)
}

/// Bind the scalar feature of a template.
pub fn bind_feature(template: &Circuit, x: f64) -> PipelineResult<Circuit> {
    bind(template, &[(FEATURE_SYMBOL, x)])
}

/// Bind every symbol of `template`; the result must be fully concrete.
pub fn bind(template: &Circuit, values: &[(&str, f64)]) -> PipelineResult<Circuit> {
    if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
        return Err(PipelineError::InvalidInput(format!(
            "feature '{name}' is {value}"
        )));
    }
    let values: HashMap<String, f64> = values
        .iter()
        .map(|(name, value)| ((*name).to_string(), *value))
        .collect();
    let circuit = template.bind_parameters(&values);

    let unbound = circuit.parameter_names();
    if !unbound.is_empty() {
        return Err(PipelineError::InvalidInput(format!(
            "no value for {}",
            unbound.join(", ")
        )));
    }

    let overflow = circuit
        .instructions()
        .filter_map(|inst| inst.as_gate())
        .find(|gate| {
            gate.kind
                .parameters()
                .iter()
                .any(|p| p.as_f64().is_some_and(|angle| !angle.is_finite()))
        });
    if let Some(gate) = overflow {
        return Err(PipelineError::InvalidInput(format!(
            "'{}' has a non-finite angle",
            gate.kind.name()
        )));
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriq_ir::StandardGate;

    fn gate_names(circuit: &Circuit) -> Vec<String> {
        circuit.instructions().map(|i| i.name().to_string()).collect()
    }

    #[test]
    fn test_fertilizer_layout() {
        let circuit = fertilizer_circuit(&SoilSample::default()).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.register(FERTILIZER_KEY).unwrap().len(), 1);
        assert!(!circuit.is_parameterized());

        let names = gate_names(&circuit);
        for gate in ["ry", "rx", "h", "cx", "measure"] {
            assert!(names.iter().any(|n| n == gate), "missing {gate}");
        }
        assert_eq!(circuit.num_ops(), 7);
    }

    #[test]
    fn test_fertilizer_angles_follow_sample() {
        let circuit = fertilizer_circuit(&SoilSample::new(0.3, 0.5, 0.7)).unwrap();
        let ry = circuit
            .instructions()
            .find_map(|i| match &i.as_gate()?.kind {
                StandardGate::Ry(p) => p.as_f64(),
                _ => None,
            })
            .unwrap();
        assert!((ry - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_classifier_template_is_symbolic() {
        let template = classifier_template(FeatureEncoding::HALF_PI).unwrap();
        assert_eq!(template.parameter_names(), vec![FEATURE_SYMBOL.to_string()]);

        let bound = bind_feature(&template, 1.0).unwrap();
        let angle = bound
            .instructions()
            .find_map(|i| match &i.as_gate()?.kind {
                StandardGate::Rx(p) => p.as_f64(),
                _ => None,
            })
            .unwrap();
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_crop_layout() {
        let circuit = crop_circuit(0.5).unwrap();
        let mut names = gate_names(&circuit);
        assert_eq!(names.last().map(String::as_str), Some("measure"));
        names.sort();
        assert_eq!(names, ["cx", "h", "measure", "rx"]);
        assert_eq!(circuit.register(CLASS_KEY).unwrap().len(), 2);
    }

    #[test]
    fn test_non_finite_feature_rejected() {
        assert!(matches!(
            classifier_circuit(f64::NAN),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(fertilizer_circuit(&SoilSample::new(f64::INFINITY, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_overflowing_angle_rejected() {
        let template = crop_template(FeatureEncoding::ScaledPi { factor: f64::MAX }).unwrap();
        let err = bind_feature(&template, 10.0).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(err.to_string().contains("non-finite angle"));
        assert!(bind_feature(&template, 0.0).is_ok());
    }

    #[test]
    fn test_missing_binding_rejected() {
        let template = fertilizer_template(FeatureEncoding::Identity).unwrap();
        let err = bind(&template, &[("nitrogen", 0.1)]).unwrap_err();
        assert!(err.to_string().contains("phosphorus"));
    }
}
