//! Gate vocabulary.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Gates the simulator knows how to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotations, the feature-encoding gates
    /// Rotation around X.
    Rx(ParameterExpression),
    /// Rotation around Y.
    Ry(ParameterExpression),
    /// Rotation around Z.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),

    // Two-qubit entanglers
    /// Controlled-X (CNOT).
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// SWAP.
    Swap,
    /// Controlled rotation around Z.
    CRz(ParameterExpression),
    /// Controlled phase.
    CP(ParameterExpression),

    /// Toffoli (CCX).
    CCX,
}

impl StandardGate {
    /// Lower-case OpenQASM-style name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::CCX => "ccx",
        }
    }

    /// Number of qubit operands.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRz(_)
            | StandardGate::CP(_) => 2,
            StandardGate::CCX => 3,
            _ => 1,
        }
    }

    /// Angle parameters, in declaration order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p) => vec![p],
            StandardGate::U(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => vec![],
        }
    }

    /// Whether any angle still holds an unbound symbol.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Apply `f` to every angle, keeping the gate kind.
    #[must_use]
    pub fn map_parameters(&self, f: impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::CRz(p) => StandardGate::CRz(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            StandardGate::U(theta, phi, lambda) => StandardGate::U(f(theta), f(phi), f(lambda)),
            other => other.clone(),
        }
    }
}

/// A gate with an optional label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The operation.
    pub kind: StandardGate,
    /// Free-form label, e.g. the feature a rotation encodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Wrap a standard gate.
    pub fn standard(kind: StandardGate) -> Self {
        Self { kind, label: None }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Gate name.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Number of qubit operands.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Gate::standard(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::Ry(0.2.into()).num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
    }

    #[test]
    fn test_parameterized() {
        assert!(!StandardGate::H.is_parameterized());
        assert!(!StandardGate::Rx(ParameterExpression::constant(0.4)).is_parameterized());
        assert!(StandardGate::Rx(ParameterExpression::symbol("phosphorus")).is_parameterized());
    }

    #[test]
    fn test_map_parameters_binds_angles() {
        let gate = StandardGate::U("a".into(), "b".into(), 0.0.into());
        let bound = gate.map_parameters(|p| p.bind("a", 1.0).bind("b", 2.0).simplify());
        assert!(!bound.is_parameterized());
        assert_eq!(bound.name(), "u");
    }

    #[test]
    fn test_labelled_gate() {
        let gate = Gate::standard(StandardGate::Ry(0.2.into())).with_label("nitrogen");
        assert_eq!(gate.name(), "ry");
        assert_eq!(gate.label.as_deref(), Some("nitrogen"));
    }
}
