//! Circuit graph: one path per wire, operations spliced in as they arrive.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

pub type NodeIndex = PetNodeIndex<u32>;

#[derive(Debug, Clone, PartialEq)]
pub enum DagNode {
    /// Start of a wire.
    In(WireId),
    /// End of a wire.
    Out(WireId),
    Op(Instruction),
}

impl DagNode {
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireId {
    Qubit(QubitId),
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// A segment of one wire between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DagEdge {
    pub wire: WireId,
}

/// Bookkeeping for one wire: its terminals and the last op on it.
#[derive(Debug, Clone, Copy)]
struct WireEnds {
    input: NodeIndex,
    output: NodeIndex,
    front: NodeIndex,
}

/// Graph form of a circuit.
///
/// Ops are only appended, never inserted or removed, so `ops` doubles as a
/// topological order.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    wires: FxHashMap<WireId, WireEnds>,
    num_qubits: usize,
    ops: Vec<NodeIndex>,
}

impl CircuitDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit wire. Adding an existing qubit does nothing.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(qubit.into()) {
            self.num_qubits += 1;
        }
    }

    /// Add a classical wire. Adding an existing bit does nothing.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        self.add_wire(clbit.into());
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
                input,
                output,
                front: input,
            },
        );
        true
    }

    /// Append an instruction after everything already on its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        let touched: Vec<WireId> = instruction
            .qubits
            .iter()
            .copied()
            .map(WireId::from)
            .chain(instruction.clbits.iter().copied().map(WireId::from))
            .collect();

        let node = self.graph.add_node(DagNode::Op(instruction));
        for wire in touched {
            self.splice(wire, node)?;
        }
        self.ops.push(node);
        Ok(node)
    }

    /// Put `node` between the wire's current front and its output.
    fn splice(&mut self, wire: WireId, node: NodeIndex) -> IrResult<()> {
        let ends = self
            .wires
            .get_mut(&wire)
            .ok_or_else(|| IrError::InvalidDag(format!("no wire {wire:?}")))?;
        let tail = self
            .graph
            .find_edge(ends.front, ends.output)
            .ok_or_else(|| IrError::InvalidDag(format!("{wire:?} detached from its output")))?;
        self.graph.remove_edge(tail);
        self.graph.add_edge(ends.front, node, DagEdge { wire });
        self.graph.add_edge(node, ends.output, DagEdge { wire });
        ends.front = node;
        Ok(())
    }

    /// Check arity and that every operand exists and is used once.
    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let op = instruction.name();
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            if instruction.qubits.len() != expected {
                return Err(IrError::QubitCountMismatch {
                    op,
                    expected,
                    got: instruction.qubits.len(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound { qubit, op });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, op });
            }
        }
        if let Some(&clbit) = instruction
            .clbits
            .iter()
            .find(|&&c| !self.wires.contains_key(&WireId::Clbit(c)))
        {
            return Err(IrError::ClbitNotFound { clbit, op });
        }
        Ok(())
    }

    /// Ops in append order, which is topological.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.ops
            .iter()
            .filter_map(move |&n| self.graph[n].instruction().map(|inst| (n, inst)))
    }

    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.wires.len() - self.num_qubits
    }

    #[inline]
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Number of op layers on the longest wire-connected chain.
    pub fn depth(&self) -> usize {
        // Terminal nodes stay at layer 0.
        let mut layer = vec![0usize; self.graph.node_count()];
        for &node in &self.ops {
            layer[node.index()] = 1 + self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|pred| layer[pred.index()])
                .max()
                .unwrap_or(0);
        }
        self.ops.iter().map(|n| layer[n.index()]).max().unwrap_or(0)
    }

    /// Qubits in ascending order.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self
            .wires
            .keys()
            .filter_map(|w| match w {
                WireId::Qubit(q) => Some(*q),
                WireId::Clbit(_) => None,
            })
            .collect();
        qubits.sort_unstable();
        qubits
    }

    /// Classical bits in ascending order.
    pub fn clbits(&self) -> Vec<ClbitId> {
        let mut clbits: Vec<_> = self
            .wires
            .keys()
            .filter_map(|w| match w {
                WireId::Clbit(c) => Some(*c),
                WireId::Qubit(_) => None,
            })
            .collect();
        clbits.sort_unstable();
        clbits
    }

    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Check that the graph is acyclic and that each wire is one unbroken
    /// path from input to output passing through its recorded front.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("cycle in circuit graph".into()));
        }

        for (&wire, ends) in &self.wires {
            let mut current = ends.input;
            let mut last_before_output = ends.input;
            for _ in 0..=self.graph.node_count() {
                if current == ends.output {
                    break;
                }
                last_before_output = current;
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target())
                    .ok_or_else(|| IrError::InvalidDag(format!("{wire:?} ends early")))?;
            }
            if current != ends.output {
                return Err(IrError::InvalidDag(format!("{wire:?} never reaches its output")));
            }
            if last_before_output != ends.front {
                return Err(IrError::InvalidDag(format!("{wire:?} front is stale")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    /// Two qubits and one classical bit, as in every trained circuit.
    fn classifier_wires() -> CircuitDag {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag.add_clbit(ClbitId(0));
        dag
    }

    fn gate(g: StandardGate, qubits: &[u32]) -> Instruction {
        Instruction::gate(g, qubits.iter().map(|&q| QubitId(q)))
    }

    #[test]
    fn encode_entangle_measure() {
        let mut dag = classifier_wires();
        dag.apply(gate(StandardGate::X, &[1])).unwrap();
        dag.apply(gate(StandardGate::CX, &[0, 1])).unwrap();
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0))).unwrap();

        let names: Vec<_> = dag.topological_ops().map(|(_, i)| i.name()).collect();
        assert_eq!(names, vec!["x", "cx", "measure"]);
        assert_eq!(dag.num_ops(), 3);
        assert_eq!(dag.depth(), 3);
        assert_eq!((dag.num_qubits(), dag.num_clbits()), (2, 1));
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn gates_on_separate_wires_share_a_layer() {
        let mut dag = classifier_wires();
        dag.apply(gate(StandardGate::Ry(0.1), &[0])).unwrap();
        dag.apply(gate(StandardGate::Ry(0.2), &[1])).unwrap();
        assert_eq!(dag.depth(), 1);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn node_lookup_returns_the_op() {
        let mut dag = classifier_wires();
        let node = dag.apply(gate(StandardGate::Rz(0.4), &[1])).unwrap();
        assert_eq!(dag.get_instruction(node).map(Instruction::name), Some("rz"));
    }

    #[test]
    fn rejects_wrong_arity() {
        let mut dag = classifier_wires();
        let err = dag.apply(gate(StandardGate::CX, &[0])).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                op: "cx",
                expected: 2,
                got: 1
            }
        ));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn rejects_missing_wires() {
        let mut dag = classifier_wires();
        assert!(matches!(
            dag.apply(gate(StandardGate::X, &[5])),
            Err(IrError::QubitNotFound { op: "x", .. })
        ));
        assert!(matches!(
            dag.apply(Instruction::measure(QubitId(0), ClbitId(2))),
            Err(IrError::ClbitNotFound { op: "measure", .. })
        ));
    }

    #[test]
    fn rejects_repeated_operand() {
        let mut dag = classifier_wires();
        let err = dag.apply(gate(StandardGate::CZ, &[1, 1])).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert_eq!(err.to_string(), "cz: qubit q1 used twice");
    }

    #[test]
    fn wire_listing_is_sorted_and_deduplicated() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(1));
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(0));
        dag.add_clbit(ClbitId(0));
        assert_eq!(dag.qubits(), vec![QubitId(0), QubitId(1)]);
        assert_eq!(dag.clbits(), vec![ClbitId(0)]);
        assert_eq!(dag.num_qubits(), 2);
    }
}
