//! Operations with their operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Unitary gate.
    Gate(Gate),
    /// Measure each qubit into the matching classical bit.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Scheduling barrier; no effect on the state.
    Barrier,
}

/// An operation applied to specific wires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Qubit operands.
    pub qubits: Vec<QubitId>,
    /// Classical operands; parallel to `qubits` for measurements.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// A gate on the given qubits.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// A single-qubit gate.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// A two-qubit gate.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Measure several qubits into several classical bits, pairwise.
    pub fn measure(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasureArity {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    /// Reset one qubit.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Barrier across the given qubits.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Whether this is a gate.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Whether this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// The gate, if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Whether a gate angle is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.as_gate().is_some_and(|g| g.kind.is_parameterized())
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.name(), "h");
        assert_eq!(inst.qubits, vec![QubitId(0)]);
    }

    #[test]
    fn test_measure_pairs_operands() {
        let inst = Instruction::measure([QubitId(0), QubitId(1)], [ClbitId(1), ClbitId(0)]).unwrap();
        assert!(inst.is_measure());
        assert_eq!(inst.clbits, vec![ClbitId(1), ClbitId(0)]);
    }

    #[test]
    fn test_measure_arity_mismatch() {
        let err = Instruction::measure([QubitId(0), QubitId(1)], [ClbitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::MeasureArity { qubits: 2, clbits: 1 }));
    }

    #[test]
    fn test_parameterized_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::Rx("x".into()), QubitId(0));
        assert!(inst.is_parameterized());
        assert!(!Instruction::reset(QubitId(0)).is_parameterized());
    }
}
