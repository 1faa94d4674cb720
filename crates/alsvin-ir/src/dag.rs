//! DAG-based circuit representation and its layered view.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a qubit wire.
    In(QubitId),
    /// Output node for a qubit wire.
    Out(QubitId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG representing a qubit wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The qubit wire this edge represents.
    pub qubit: QubitId,
}

/// DAG-based circuit representation.
///
/// The circuit is represented as a directed acyclic graph where:
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Edges represent qubit wires
/// - Each wire has exactly one input and one output node
/// - Operations are connected to wires in program order
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from qubit to its input node.
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
        }
    }

    /// Add a qubit to the circuit.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(qubit));
        let out_node = self.graph.add_node(DagNode::Out(qubit));
        self.graph.add_edge(in_node, out_node, DagEdge { qubit });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
    }

    /// Apply an instruction to the circuit.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = instruction.name();

        // Validate gate arity matches qubit count
        let expected = instruction.gate.num_qubits() as usize;
        let got = instruction.qubits.len();
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected: expected as u32,
                got: got as u32,
            });
        }

        // Validate qubits exist
        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }

        // Check for duplicate qubits in the instruction
        let mut seen = FxHashMap::default();
        for &qubit in &instruction.qubits {
            if seen.insert(qubit, ()).is_some() {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }

        // Add the operation node and splice it into each wire just before
        // the wire's output node.
        let op_node = self.graph.add_node(DagNode::Op(instruction.clone()));

        for &qubit in &instruction.qubits {
            let out_node = self.qubit_outputs[&qubit];

            let incoming: Vec<_> = self
                .graph
                .edges_directed(out_node, Direction::Incoming)
                .filter(|e| e.weight().qubit == qubit)
                .map(|e| (e.source(), e.id()))
                .collect();

            if let Some((prev_node, edge_id)) = incoming.first() {
                self.graph.remove_edge(*edge_id);
                self.graph.add_edge(*prev_node, op_node, DagEdge { qubit });
                self.graph.add_edge(op_node, out_node, DagEdge { qubit });
            }
        }

        Ok(op_node)
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        let sorted: Vec<_> = petgraph::algo::toposort(&self.graph, None)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|idx| {
                if let DagNode::Op(inst) = &self.graph[idx] {
                    Some((idx, inst))
                } else {
                    None
                }
            })
            .collect();

        sorted.into_iter()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&idx| matches!(self.graph[idx], DagNode::Op(_)))
            .count()
    }

    /// Calculate the circuit depth.
    pub fn depth(&self) -> usize {
        self.node_layers().values().copied().max().unwrap_or(0)
    }

    /// Iterate over qubits.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubit_inputs.keys().copied()
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Assign each node its layer: the length of the longest chain of
    /// operation nodes from any wire input up to and including the node.
    /// Input nodes sit at layer 0, so operation layers are 1-based.
    fn node_layers(&self) -> FxHashMap<NodeIndex, usize> {
        let mut layers: FxHashMap<NodeIndex, usize> = FxHashMap::default();

        for node in petgraph::algo::toposort(&self.graph, None).unwrap_or_default() {
            let max_pred_layer = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| layers.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_layer = if matches!(self.graph[node], DagNode::Op(_)) {
                max_pred_layer + 1
            } else {
                max_pred_layer
            };

            layers.insert(node, node_layer);
        }

        layers
    }

    /// Build the aligned per-qubit layer view of this circuit.
    pub fn layered(&self) -> LayeredDag {
        let num_qubits = self
            .qubit_inputs
            .keys()
            .map(|q| q.index() + 1)
            .max()
            .unwrap_or(0);
        let mut columns: Vec<Vec<Option<Instruction>>> = vec![Vec::new(); num_qubits];

        let layers = self.node_layers();
        for idx in self.graph.node_indices() {
            let DagNode::Op(inst) = &self.graph[idx] else {
                continue;
            };
            let layer = layers[&idx];
            for &qubit in &inst.qubits {
                let column = &mut columns[qubit.index()];
                if column.len() < layer {
                    column.resize(layer, None);
                }
                column[layer - 1] = Some(inst.clone());
            }
        }

        LayeredDag { columns }
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CircuitDag {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            qubit_inputs: self.qubit_inputs.clone(),
            qubit_outputs: self.qubit_outputs.clone(),
        }
    }
}

/// Aligned per-qubit layer view of a circuit.
///
/// Entry `q` is the ordered list of gate slots on qubit `q`; slot `k` holds
/// the gate acting on `q` in layer `k`, or `None` when the qubit idles while
/// another wire is busy. A two-qubit gate occupies the same layer index in
/// both of its columns, so a CNOT is visible from its control and its target
/// at the same `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredDag {
    columns: Vec<Vec<Option<Instruction>>>,
}

impl LayeredDag {
    /// Number of qubit columns.
    pub fn num_qubits(&self) -> usize {
        self.columns.len()
    }

    /// Circuit depth: the longest column.
    pub fn depth(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The gate slots for one qubit.
    pub fn column(&self, qubit: usize) -> &[Option<Instruction>] {
        &self.columns[qubit]
    }

    /// The gate acting on `qubit` in layer `layer`, if any.
    pub fn gate_at(&self, qubit: usize, layer: usize) -> Option<&Instruction> {
        self.columns
            .get(qubit)
            .and_then(|column| column.get(layer))
            .and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_apply_gate() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));

        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        dag.apply(inst).unwrap();

        assert_eq!(dag.num_ops(), 1);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));

        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));

        let inst = Instruction::new(StandardGate::CX, [QubitId(0)]);
        let result = dag.apply(inst);

        match result {
            Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            }) => {
                assert_eq!(gate_name, "cx");
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            _ => panic!("Expected QubitCountMismatch error"),
        }
    }

    #[test]
    fn test_qubit_not_found() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));

        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(99));
        let result = dag.apply(inst);

        match result {
            Err(IrError::QubitNotFound { qubit, gate_name }) => {
                assert_eq!(qubit, QubitId(99));
                assert_eq!(gate_name, Some("cx".to_string()));
            }
            _ => panic!("Expected QubitNotFound error"),
        }
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));

        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(0));
        assert!(matches!(
            dag.apply(inst),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_layered_cnot_alignment() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));

        // H on q0 pushes the CNOT to layer 1; q1 idles in layer 0.
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        let layered = dag.layered();
        assert_eq!(layered.num_qubits(), 2);
        assert_eq!(layered.depth(), 2);

        assert_eq!(
            layered.gate_at(0, 0).map(Instruction::name),
            Some("h")
        );
        assert!(layered.gate_at(1, 0).is_none());

        // The CNOT shows up in both columns at the same layer index.
        let on_control = layered.gate_at(0, 1).expect("cx on control");
        let on_target = layered.gate_at(1, 1).expect("cx on target");
        assert_eq!(on_control, on_target);
        assert_eq!(on_control.controls(), &[QubitId(0)]);
    }

    #[test]
    fn test_layered_depth_matches_dag() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag.add_qubit(QubitId(2));

        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(1),
            QubitId(2),
        ))
        .unwrap();

        assert_eq!(dag.depth(), 3);
        assert_eq!(dag.layered().depth(), 3);
    }
}
