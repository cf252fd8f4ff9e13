//! Dependency graph of a circuit.
//!
//! Every wire (qubit or classical bit) runs from an input node to an output
//! node; operations are spliced into the wires they touch. Walking the graph
//! in topological order yields a valid execution order.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Start of a wire.
    In(WireId),
    /// End of a wire.
    Out(WireId),
    /// An operation.
    Op(Instruction),
}

impl DagNode {
    /// The instruction, for operation nodes.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// A quantum or classical wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// Quantum wire.
    Qubit(QubitId),
    /// Classical wire.
    Clbit(ClbitId),
}

/// Edge weight: the wire the edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire.
    pub wire: WireId,
}

/// Wire endpoints plus the node currently closest to the output.
#[derive(Debug, Clone, Copy)]
struct WireEnds {
    output: NodeIndex,
    front: NodeIndex,
}

/// DAG-based circuit representation.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    wires: FxHashMap<WireId, WireEnds>,
    num_qubits: usize,
    num_clbits: usize,
}

impl CircuitDag {
    /// Create an empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.wires.contains_key(&wire) {
            return false;
        }
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, DagEdge { wire });
        self.wires.insert(
            wire,
            WireEnds {
                output,
                front: input,
            },
        );
        true
    }

    /// Add a qubit wire. Re-adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Add a classical wire. Re-adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.num_clbits += 1;
        }
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                let got = instruction.qubits.len() as u32;
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected,
                        got,
                    });
                }
                Some(gate.name().to_string())
            }
            _ => None,
        };

        self.validate_qubits(&instruction.qubits, gate_name.as_deref())?;
        for &clbit in &instruction.clbits {
            if !self.wires.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound { clbit, gate_name });
            }
        }
        Ok(())
    }

    /// Every qubit must be declared and appear once.
    pub(crate) fn validate_qubits(&self, qubits: &[QubitId], gate_name: Option<&str>) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for &qubit in qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.map(str::to_string),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.map(str::to_string),
                });
            }
        }
        Ok(())
    }

    /// Splice `op` between the wire's front node and its output node.
    fn splice(&mut self, wire: WireId, op: NodeIndex) -> IrResult<()> {
        let ends = self.wires[&wire];
        let edge = self
            .graph
            .edges_directed(ends.front, Direction::Outgoing)
            .find(|e| e.weight().wire == wire && e.target() == ends.output)
            .map(|e| e.id())
            .ok_or_else(|| IrError::InvalidDag(format!("wire {wire:?} has no open edge")))?;
        self.graph.remove_edge(edge);
        self.graph.add_edge(ends.front, op, DagEdge { wire });
        self.graph.add_edge(op, ends.output, DagEdge { wire });
        self.wires.insert(
            wire,
            WireEnds {
                output: ends.output,
                front: op,
            },
        );
        Ok(())
    }

    /// Append an instruction after everything already on its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        let wires: Vec<WireId> = instruction
            .qubits
            .iter()
            .map(|&q| WireId::Qubit(q))
            .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
            .collect();

        let op = self.graph.add_node(DagNode::Op(instruction));
        for wire in wires {
            self.splice(wire, op)?;
        }
        Ok(op)
    }

    /// Operations in a valid execution order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        // Wires only ever extend forward, so the graph cannot contain a cycle.
        let order = petgraph::algo::toposort(&self.graph, None).unwrap_or_default();
        order
            .into_iter()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Rewrite every instruction in place.
    pub fn map_instructions(&mut self, mut f: impl FnMut(&mut Instruction)) {
        for node in self.graph.node_weights_mut() {
            if let DagNode::Op(inst) = node {
                f(inst);
            }
        }
    }

    /// Number of operation nodes.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count() - 2 * self.wires.len()
    }

    /// Number of qubit wires.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical wires.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Longest chain of operations along any path.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut max_depth = 0;

        for node in petgraph::algo::toposort(&self.graph, None).unwrap_or_default() {
            let pred = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .filter_map(|e| depths.get(&e.source()).copied())
                .max()
                .unwrap_or(0);
            let depth = pred + usize::from(matches!(self.graph[node], DagNode::Op(_)));
            max_depth = max_depth.max(depth);
            depths.insert(node, depth);
        }

        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn dag_with(qubits: u32, clbits: u32) -> CircuitDag {
        let mut dag = CircuitDag::new();
        (0..qubits).for_each(|q| dag.add_qubit(QubitId(q)));
        (0..clbits).for_each(|c| dag.add_clbit(ClbitId(c)));
        dag
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_readding_wire_is_noop() {
        let mut dag = dag_with(2, 0);
        dag.add_qubit(QubitId(0));
        assert_eq!(dag.num_qubits(), 2);
    }

    #[test]
    fn test_entangler_depth() {
        let mut dag = dag_with(2, 1);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)))
            .unwrap();
        dag.apply(Instruction::measure([QubitId(0)], [ClbitId(0)]).unwrap())
            .unwrap();

        assert_eq!(dag.num_ops(), 3);
        assert_eq!(dag.depth(), 3);
    }

    #[test]
    fn test_parallel_rotations_share_a_layer() {
        let mut dag = dag_with(3, 0);
        for q in 0..3 {
            dag.apply(Instruction::single_qubit_gate(
                StandardGate::Ry(0.3.into()),
                QubitId(q),
            ))
            .unwrap();
        }
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_topological_order_respects_wires() {
        let mut dag = dag_with(2, 0);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();

        let names: Vec<_> = dag.topological_ops().map(|(_, i)| i.name()).collect();
        assert_eq!(names, ["h", "cx", "h"]);
    }

    #[test]
    fn test_arity_mismatch() {
        let mut dag = dag_with(2, 0);
        let err = dag
            .apply(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_qubit_reports_gate() {
        let mut dag = dag_with(1, 0);
        let err = dag
            .apply(Instruction::single_qubit_gate(StandardGate::X, QubitId(4)))
            .unwrap_err();
        assert_eq!(err.to_string(), "Qubit q4 not found in circuit (gate: x)");
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut dag = dag_with(2, 0);
        let err = dag
            .apply(Instruction::two_qubit_gate(StandardGate::CZ, QubitId(1), QubitId(1)))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_unknown_clbit() {
        let mut dag = dag_with(1, 0);
        let err = dag
            .apply(Instruction::measure([QubitId(0)], [ClbitId(0)]).unwrap())
            .unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));
    }
}
