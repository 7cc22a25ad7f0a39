//! Circuit representation for qlogic.
//!
//! A [`Circuit`] is a thin builder over a [`CircuitDag`], a petgraph graph
//! holding one path per qubit or classical bit with operations spliced in
//! along it. The gate set is the one the logic-gate ansätze need: `X` for
//! loading inputs, single-axis rotations, and the two-qubit entanglers.
//! [`draw`] turns a circuit into the text diagram printed after training.
//!
//! # Example
//!
//! ```rust
//! use qlogic_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("xor_probe", 2, 1);
//! circuit.x(QubitId(0)).unwrap();
//! circuit.cx(QubitId(1), QubitId(0)).unwrap();
//! circuit.measure(QubitId(0), ClbitId(0)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```

pub mod circuit;
pub mod dag;
pub mod draw;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use draw::{TextDrawer, draw};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
