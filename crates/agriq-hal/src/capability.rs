//! Backend capability introspection.

use serde::{Deserialize, Serialize};

/// What a backend can execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate names.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Free-form feature flags, e.g. `"statevector"`, `"seeded"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a local statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec!["statevector".into()],
        }
    }

    /// Add a feature flag.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }
}

/// Gate names a backend accepts, by arity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Every gate in the agriq vocabulary.
    pub fn universal() -> Self {
        let names = |list: &[&str]| -> Vec<String> { list.iter().map(|s| (*s).to_string()).collect() };
        Self {
            single_qubit: names(&[
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "sxdg", "rx", "ry", "rz",
                "p", "u",
            ]),
            two_qubit: names(&["cx", "cy", "cz", "ch", "swap", "crz", "cp"]),
            three_qubit: names(&["ccx"]),
        }
    }

    /// Whether `name` is accepted.
    pub fn contains(&self, name: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .any(|g| g == name)
    }
}
