//! Property tests for circuit construction.

use std::collections::HashMap;

use agriq_ir::{Circuit, ParameterExpression, QubitId};
use proptest::prelude::*;

/// A gate drawn by index: 0 = H, 1 = Rx(angle), 2 = CX(q, q+1).
fn build(num_qubits: u32, ops: &[(u8, u32, f64)]) -> Circuit {
    let mut circuit = Circuit::with_size("prop", num_qubits, 0);
    for &(kind, q, angle) in ops {
        let q = q % num_qubits;
        match kind % 3 {
            0 => {
                circuit.h(QubitId(q)).unwrap();
            }
            1 => {
                circuit.rx(angle, QubitId(q)).unwrap();
            }
            _ if num_qubits > 1 => {
                circuit.cx(QubitId(q), QubitId((q + 1) % num_qubits)).unwrap();
            }
            _ => {
                circuit.x(QubitId(q)).unwrap();
            }
        }
    }
    circuit
}

proptest! {
    #[test]
    fn depth_never_exceeds_op_count(
        num_qubits in 1u32..5,
        ops in prop::collection::vec((0u8..3, 0u32..8, -3.2f64..3.2), 0..40),
    ) {
        let circuit = build(num_qubits, &ops);
        prop_assert_eq!(circuit.num_ops(), ops.len());
        prop_assert!(circuit.depth() <= circuit.num_ops());
        prop_assert_eq!(circuit.instructions().count(), ops.len());
    }

    #[test]
    fn binding_every_symbol_removes_parameters(values in prop::collection::vec(-1.0f64..1.0, 1..6)) {
        let mut circuit = Circuit::with_size("template", values.len() as u32, 0);
        for i in 0..values.len() {
            circuit
                .ry(ParameterExpression::symbol(format!("f{i}")), QubitId(i as u32))
                .unwrap();
        }
        prop_assert!(circuit.is_parameterized());

        let bindings: HashMap<String, f64> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("f{i}"), *v))
            .collect();
        let bound = circuit.bind_parameters(&bindings);
        prop_assert!(!bound.is_parameterized());
        prop_assert_eq!(bound.num_ops(), circuit.num_ops());
    }
}
