//! Circuit builder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A named block of classical bits. The name is the measurement key
/// results are read back by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    /// Measurement key.
    pub name: String,
    /// Bits in register order; index 0 is bit 0 of the key.
    pub clbits: Vec<ClbitId>,
}

impl ClassicalRegister {
    /// Number of bits.
    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    /// Whether the register has no bits.
    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }
}

/// A quantum circuit.
///
/// Gate methods return `&mut Self` so circuits can be chained:
///
/// ```rust
/// use agriq_ir::{Circuit, QubitId};
///
/// let (q0, q1) = (QubitId(0), QubitId(1));
/// let mut circuit = Circuit::with_size("crop", 2, 0);
/// circuit.h(q0)?.rx(0.5, q1)?.cx(q0, q1)?;
/// assert_eq!(circuit.num_ops(), 3);
/// # Ok::<(), agriq_ir::IrError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    registers: Vec<ClassicalRegister>,
    dag: CircuitDag,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            registers: vec![],
            dag: CircuitDag::new(),
        }
    }

    /// Create a circuit with anonymous qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    fn next_qubit(&self) -> QubitId {
        QubitId(self.qubits.len() as u32)
    }

    fn next_clbit(&self) -> ClbitId {
        ClbitId(self.clbits.len() as u32)
    }

    /// Add one anonymous qubit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit();
        self.qubits.push(Qubit::new(id));
        self.dag.add_qubit(id);
        id
    }

    /// Add a named quantum register.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_qubit();
                self.qubits.push(Qubit::with_register(id, &name, i));
                self.dag.add_qubit(id);
                id
            })
            .collect()
    }

    /// Add one anonymous classical bit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.next_clbit();
        self.clbits.push(Clbit::new(id));
        self.dag.add_clbit(id);
        id
    }

    /// Add a named classical register, i.e. a measurement key.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<ClbitId>> {
        let name = name.into();
        if self.register(&name).is_some() {
            return Err(IrError::DuplicateKey(name));
        }
        let ids: Vec<_> = (0..size)
            .map(|i| {
                let id = self.next_clbit();
                self.clbits.push(Clbit::with_register(id, &name, i));
                self.dag.add_clbit(id);
                id
            })
            .collect();
        self.registers.push(ClassicalRegister {
            name,
            clbits: ids.clone(),
        });
        Ok(ids)
    }

    fn apply_single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(gate, qubit))?;
        Ok(self)
    }

    fn apply_two(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::two_qubit_gate(gate, q1, q2))?;
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::S, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::T, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::SX, qubit)
    }

    /// Apply Rx rotation.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::Rx(theta.into()), qubit)
    }

    /// Apply Ry rotation.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::Ry(theta.into()), qubit)
    }

    /// Apply Rz rotation.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::Rz(theta.into()), qubit)
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_single(StandardGate::P(theta.into()), qubit)
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_single(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            qubit,
        )
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_two(StandardGate::CX, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_two(StandardGate::CZ, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply_two(StandardGate::Swap, q1, q2)
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply_two(StandardGate::CP(theta.into()), control, target)
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply any gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Measurement and other operations
    // =========================================================================

    /// Measure a qubit into an existing classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure([qubit], [clbit])?)?;
        Ok(self)
    }

    /// Measure `qubits` into a new register named `key`.
    ///
    /// Bit `i` of the key holds the outcome of `qubits[i]`.
    pub fn measure_key(
        &mut self,
        key: impl Into<String>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        // Checked before the register exists so a failed call leaves no key behind.
        self.dag.validate_qubits(&qubits, None)?;
        let clbits = self.add_creg(key, qubits.len() as u32)?;
        self.dag.apply(Instruction::measure(qubits, clbits)?)?;
        Ok(self)
    }

    /// Measure every qubit into a register named `meas`.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.measure_key("meas", qubits)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::reset(qubit))?;
        Ok(self)
    }

    /// Barrier across all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Whether any gate angle is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.instructions().any(Instruction::is_parameterized)
    }

    /// Names of all unbound symbols.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .instructions()
            .filter_map(Instruction::as_gate)
            .flat_map(|g| g.kind.parameters().into_iter().flat_map(|p| p.symbols()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Copy of this circuit with symbols replaced by `values`.
    ///
    /// Symbols missing from `values` stay symbolic.
    #[must_use]
    pub fn bind_parameters(&self, values: &HashMap<String, f64>) -> Self {
        let mut bound = self.clone();
        bound.dag.map_instructions(|inst| {
            if let InstructionKind::Gate(gate) = &mut inst.kind {
                gate.kind = gate.kind.map_parameters(|p| p.bind_all(values));
            }
        });
        bound
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Qubits.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Classical bits.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Named classical registers, in creation order.
    pub fn registers(&self) -> &[ClassicalRegister] {
        &self.registers
    }

    /// Register for a measurement key.
    pub fn register(&self, key: &str) -> Option<&ClassicalRegister> {
        self.registers.iter().find(|r| r.name == key)
    }

    /// Instructions in execution order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// The underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Bell pair measured into key `m`.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 0);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        circuit.measure_key("m", [QubitId(0), QubitId(1)])?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_with_size() {
        let circuit = Circuit::with_size("soil", 3, 2);
        assert_eq!(circuit.name(), "soil");
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert!(circuit.registers().is_empty());
    }

    #[test]
    fn test_registers() {
        let mut circuit = Circuit::new("regs");
        let qs = circuit.add_qreg("q", 2);
        let cs = circuit.add_creg("recommended_fertilizer", 1).unwrap();

        assert_eq!(qs, vec![QubitId(0), QubitId(1)]);
        assert_eq!(cs, vec![ClbitId(0)]);
        assert_eq!(circuit.register("recommended_fertilizer").unwrap().len(), 1);
        assert!(circuit.register("m").is_none());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut circuit = Circuit::with_size("dup", 1, 0);
        circuit.measure_key("m", [QubitId(0)]).unwrap();
        let err = circuit.measure_key("m", [QubitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateKey(k) if k == "m"));
    }

    #[test]
    fn test_failed_measure_key_leaves_no_register() {
        let mut circuit = Circuit::with_size("retry", 2, 0);
        let err = circuit.measure_key("m", [QubitId(7)]).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { .. }));
        assert!(circuit.register("m").is_none());
        assert_eq!(circuit.num_clbits(), 0);

        let err = circuit.measure_key("m", [QubitId(1), QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert!(circuit.register("m").is_none());

        circuit.measure_key("m", [QubitId(0)]).unwrap();
        assert_eq!(circuit.register("m").unwrap().len(), 1);
        assert_eq!(circuit.num_ops(), 1);
    }

    #[test]
    fn test_bell() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_measure_key_order() {
        let mut circuit = Circuit::with_size("order", 3, 0);
        circuit.measure_key("m", [QubitId(2), QubitId(0)]).unwrap();
        let reg = circuit.register("m").unwrap();
        assert_eq!(reg.clbits, vec![ClbitId(0), ClbitId(1)]);

        let measure = circuit.instructions().find(|i| i.is_measure()).unwrap();
        assert_eq!(measure.qubits, vec![QubitId(2), QubitId(0)]);
    }

    #[test]
    fn test_bind_parameters() {
        let mut circuit = Circuit::with_size("template", 1, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .rx(ParameterExpression::symbol("x") * ParameterExpression::pi() / 2.0, QubitId(0))
            .unwrap();
        assert!(circuit.is_parameterized());
        assert_eq!(circuit.parameter_names(), vec!["x".to_string()]);

        let bound = circuit.bind_parameters(&HashMap::from([("x".to_string(), 1.0)]));
        assert!(!bound.is_parameterized());
        assert!(circuit.is_parameterized(), "template must stay unbound");

        let angle = bound
            .instructions()
            .find_map(|i| match &i.as_gate()?.kind {
                StandardGate::Rx(p) => p.as_f64(),
                _ => None,
            })
            .unwrap();
        assert!((angle - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("fluent", 2, 2);
        circuit
            .ry(0.2, QubitId(0))
            .unwrap()
            .rx(0.4, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();

        assert_eq!(circuit.num_ops(), 4);
        assert_eq!(circuit.depth(), 3);
    }
}
