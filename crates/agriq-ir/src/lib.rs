//! agriq circuit representation
//!
//! Small, fixed-topology circuits that turn a handful of scalar features
//! (soil nutrient levels, a scaled sensor reading) into rotation angles,
//! entangle a few qubits and measure into named classical registers.
//!
//! # Core Components
//!
//! - [`QubitId`], [`ClbitId`] address quantum and classical wires
//! - [`StandardGate`] is the gate vocabulary understood by the simulator
//! - [`ParameterExpression`] holds concrete or symbolic rotation angles
//! - [`Instruction`] pairs an operation with its operands
//! - [`CircuitDag`] is the dependency graph the simulator walks
//! - [`Circuit`] is the builder used by the pipelines
//!
//! # Example: a measured Bell pair
//!
//! ```rust
//! use agriq_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_key("m", [QubitId(0), QubitId(1)]).unwrap();
//!
//! assert_eq!(circuit.num_clbits(), 2);
//! assert_eq!(circuit.register("m").unwrap().len(), 2);
//! ```
//!
//! # Example: a feature template
//!
//! ```rust
//! use agriq_ir::{Circuit, ParameterExpression, QubitId};
//! use std::collections::HashMap;
//!
//! let mut template = Circuit::with_size("classifier", 1, 0);
//! let x = ParameterExpression::symbol("x");
//! template.h(QubitId(0)).unwrap();
//! template.rx(x * ParameterExpression::pi() / ParameterExpression::constant(2.0), QubitId(0)).unwrap();
//! assert!(template.is_parameterized());
//!
//! let bound = template.bind_parameters(&HashMap::from([("x".to_string(), 0.5)]));
//! assert!(!bound.is_parameterized());
//! ```

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::{Circuit, ClassicalRegister};
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
