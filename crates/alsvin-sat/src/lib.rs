//! SAT-based equivalence checking of Clifford circuits.
//!
//! This crate decides whether two Clifford circuits produce the same output
//! on every chosen stabilizer input by reducing the question to bit-vector
//! satisfiability. The pipeline has two stages:
//!
//! 1. **Symbolic simulation**: each circuit is simulated layer by layer on a
//!    bank of stabilizer tableaux, one per input state. After every layer the
//!    tableau's canonical generator is interned into a registry of dense
//!    identifiers shared by both circuits, and the per-layer transition
//!    `previous id -> next id` is recorded.
//! 2. **Constraint encoding**: one bit-vector variable per layer boundary is
//!    constrained to follow the recorded transitions. A miter ties the two
//!    circuits together with equal-input / unequal-output clauses, so the
//!    instance is satisfiable exactly when some input drives the circuits
//!    apart. Unsatisfiability proves equivalence.
//!
//! # Example
//!
//! ```rust
//! use alsvin_ir::{Circuit, QubitId};
//! use alsvin_sat::EquivalenceChecker;
//!
//! // H applied twice is the identity.
//! let mut doubled = Circuit::with_size("hh", 1);
//! doubled.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
//!
//! let mut idle = Circuit::with_size("idle", 1);
//! idle.i(QubitId(0)).unwrap();
//!
//! let mut checker = EquivalenceChecker::new();
//! let equal = checker.test_equal(&doubled, &idle, &[]).unwrap();
//! assert!(equal);
//! ```
//!
//! Measurements, non-Clifford gates and counter-example reconstruction are
//! out of scope; circuits containing unsupported gates are refused with
//! [`SatError::InvalidCircuit`] instead of being answered wrongly.

pub mod checker;
pub mod encoder;
pub mod error;
pub mod preprocess;
pub mod registry;
pub mod solver;
pub mod stats;
pub mod tableau;

pub use checker::EquivalenceChecker;
pub use encoder::{encode_miter, encode_single};
pub use error::{SatError, SatResult};
pub use preprocess::{preprocess, CircuitRepresentation};
pub use registry::{GeneratorId, GeneratorRegistry};
pub use solver::{BitVec, SatInstance, Verdict};
pub use stats::Statistics;
pub use tableau::{GeneratorKey, StabilizerTableau};
