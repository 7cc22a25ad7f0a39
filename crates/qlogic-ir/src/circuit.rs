//! Fluent builder over [`CircuitDag`].

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A named circuit with sequentially numbered wires.
///
/// Every gate method appends to the end of the circuit and returns `&mut
/// Self`, so a whole layer can be chained with `?`.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    dag: CircuitDag,
}

macro_rules! single_qubit {
    ($($(#[$doc:meta])* $method:ident => $gate:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
                self.push(Instruction::gate(StandardGate::$gate(theta), [qubit]))
            }
        )*
    };
}

macro_rules! two_qubit {
    ($($(#[$doc:meta])* $method:ident => $gate:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
                self.push(Instruction::gate(StandardGate::$gate, [a, b]))
            }
        )*
    };
}

impl Circuit {
    /// A circuit with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dag: CircuitDag::new(),
        }
    }

    /// Qubits `0..num_qubits` and classical bits `0..num_clbits`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        (0..num_qubits).for_each(|_| {
            circuit.add_qubit();
        });
        (0..num_clbits).for_each(|_| {
            circuit.add_clbit();
        });
        circuit
    }

    /// Append a qubit numbered after the existing ones.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.dag.num_qubits() as u32);
        self.dag.add_qubit(id);
        id
    }

    /// Append a classical bit numbered after the existing ones.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.dag.num_clbits() as u32);
        self.dag.add_clbit(id);
        id
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    /// Bit flip, used to load a classical 1.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::X, [qubit]))
    }

    single_qubit! {
        rx => Rx;
        ry => Ry;
        rz => Rz;
    }

    two_qubit! {
        /// CNOT with `a` as control.
        cx => CX;
        cz => CZ;
        swap => Swap;
        iswap => ISwap;
    }

    /// X rotation on `target` conditioned on `control`.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CRx(theta), [control, target]))
    }

    /// Append any gate; arity is checked against `qubits`.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Barrier across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits = self.dag.qubits();
        self.push(Instruction::barrier(qubits))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    pub fn num_clbits(&self) -> usize {
        self.dag.num_clbits()
    }

    /// All instructions, measurements and barriers included.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Instructions in the order they were appended.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Gates only.
    pub fn gate_count(&self) -> usize {
        self.instructions().filter(|i| i.as_gate().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn sizes_wires_sequentially() {
        let mut circuit = Circuit::with_size("and_pqc", 2, 1);
        assert_eq!(circuit.name(), "and_pqc");
        assert_eq!((circuit.num_qubits(), circuit.num_clbits()), (2, 1));
        assert_eq!(circuit.add_qubit(), QubitId(2));
        assert_eq!(circuit.add_clbit(), ClbitId(1));
        assert_eq!(Circuit::new("empty").num_qubits(), 0);
    }

    #[test]
    fn chains_a_block() -> IrResult<()> {
        let mut circuit = Circuit::with_size("block", 2, 1);
        circuit
            .ry(PI / 2.0, QubitId(0))?
            .crx(PI / 2.0, QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?;

        assert_eq!(circuit.depth(), 3);
        assert_eq!(circuit.gate_count(), 2);
        assert_eq!(circuit.num_ops(), 3);
        Ok(())
    }

    #[test]
    fn barrier_spans_every_qubit() {
        let mut circuit = Circuit::with_size("sep", 2, 0);
        circuit.x(QubitId(0)).unwrap().barrier_all().unwrap();
        let barrier = circuit.instructions().last().unwrap();
        assert!(barrier.is_barrier());
        assert_eq!(barrier.qubits, vec![QubitId(0), QubitId(1)]);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn keeps_append_order() {
        let mut circuit = Circuit::with_size("order", 2, 0);
        circuit
            .rz(0.1, QubitId(1))
            .unwrap()
            .iswap(QubitId(0), QubitId(1))
            .unwrap()
            .rx(0.2, QubitId(0))
            .unwrap()
            .swap(QubitId(1), QubitId(0))
            .unwrap();
        let names: Vec<_> = circuit.instructions().map(Instruction::name).collect();
        assert_eq!(names, vec!["rz", "iswap", "rx", "swap"]);
    }

    #[test]
    fn rejects_unknown_wires() {
        let mut circuit = Circuit::with_size("small", 2, 1);
        assert!(circuit.x(QubitId(2)).is_err());
        assert!(circuit.measure(QubitId(0), ClbitId(1)).is_err());
        assert_eq!(circuit.num_ops(), 0);
    }
}
