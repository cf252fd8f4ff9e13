//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building or transforming a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not declared in the circuit.
    #[error("Qubit {qubit} not found in circuit{}", gate_context(.gate_name))]
    QubitNotFound {
        /// The missing qubit.
        qubit: QubitId,
        /// Gate being applied, if any.
        gate_name: Option<String>,
    },

    /// Classical bit not declared in the circuit.
    #[error("Classical bit {clbit} not found in circuit{}", gate_context(.gate_name))]
    ClbitNotFound {
        /// The missing classical bit.
        clbit: ClbitId,
        /// Gate being applied, if any.
        gate_name: Option<String>,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation{}", gate_context(.gate_name))]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Gate being applied, if any.
        gate_name: Option<String>,
    },

    /// Operand count does not match the gate arity.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Arity of the gate.
        expected: u32,
        /// Operands supplied.
        got: u32,
    },

    /// Measurement with unequal qubit and clbit lists.
    #[error("Measurement maps {qubits} qubits onto {clbits} classical bits")]
    MeasureArity {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of target classical bits.
        clbits: usize,
    },

    /// A classical register with this key already exists.
    #[error("Measurement key '{0}' is already in use")]
    DuplicateKey(String),

    /// Parameter is unbound.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Internal DAG bookkeeping is inconsistent.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),
}

#[allow(clippy::ref_option)]
fn gate_context(gate_name: &Option<String>) -> String {
    gate_name
        .as_ref()
        .map(|name| format!(" (gate: {name})"))
        .unwrap_or_default()
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
