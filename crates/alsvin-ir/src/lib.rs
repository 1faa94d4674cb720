//! Alsvin Circuit Intermediate Representation
//!
//! This crate provides the data structures for representing Clifford circuits
//! in Alsvin. It is the input layer for the SAT-based equivalence engine in
//! `alsvin-sat`.
//!
//! # Overview
//!
//! Circuits are stored as a DAG (Directed Acyclic Graph) over qubit wires,
//! which makes depth computation and layer extraction cheap. The high-level
//! [`Circuit`] API provides a builder pattern for constructing circuits, and
//! [`LayeredDag`] exposes the per-qubit layer view consumed by the symbolic
//! simulator.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing quantum wires
//! - **Gates**: [`StandardGate`] for the supported gate alphabet
//! - **Instructions**: [`Instruction`] combining a gate with its operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Layers**: [`LayeredDag`] for the aligned per-qubit layer view
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell-pair preparation
//!
//! ```rust
//! use alsvin_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_prep", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I` | 1 | Identity gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates (not Clifford-checkable) |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CZ` | 2 | Controlled-Z |
//! | `Swap` | 2 | SWAP gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, LayeredDag, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
