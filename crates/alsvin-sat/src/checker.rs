//! Equivalence and satisfiability checking drivers.

use std::time::Instant;

use alsvin_ir::Circuit;
use tracing::{debug, info};

use crate::encoder::{encode_miter, encode_single};
use crate::error::{SatError, SatResult};
use crate::preprocess::preprocess;
use crate::registry::GeneratorRegistry;
use crate::solver::{SatInstance, Verdict};
use crate::stats::Statistics;

/// Orchestrates preprocessing, encoding and solving for one query.
///
/// A checker accumulates [`Statistics`] across its lifetime; use one checker
/// per query when per-query numbers matter.
pub struct EquivalenceChecker {
    stats: Statistics,
}

impl EquivalenceChecker {
    /// Create a checker with zeroed statistics.
    pub fn new() -> Self {
        Self {
            stats: Statistics::default(),
        }
    }

    /// Decide whether two Clifford circuits agree on every chosen input.
    ///
    /// `inputs` holds stabilizer strings over `{z, Z, x, X, y, Y}`; an empty
    /// slice means the single all-zero input state. Returns `Ok(true)` when
    /// the miter is unsatisfiable, i.e. no shared input can drive the
    /// circuits to different output generators.
    ///
    /// Fails with [`SatError::InvalidCircuit`] before any solver work when a
    /// circuit contains a gate outside the Clifford alphabet, with
    /// [`SatError::EmptyCircuit`] when either circuit has no gates, and with
    /// [`SatError::SolverUnknown`] when the solver gives up; no equivalence
    /// claim is made in that case.
    pub fn test_equal(
        &mut self,
        circuit_one: &Circuit,
        circuit_two: &Circuit,
        inputs: &[String],
    ) -> SatResult<bool> {
        ensure_clifford(circuit_one)?;
        ensure_clifford(circuit_two)?;
        if circuit_one.is_empty() || circuit_two.is_empty() {
            return Err(SatError::EmptyCircuit);
        }

        self.stats.num_input_states = inputs.len() as u64;
        self.stats.num_qubits = circuit_one.num_qubits() as u64;

        let dag_one = circuit_one.layered();
        let dag_two = circuit_two.layered();

        // One registry for both circuits makes their ids directly
        // comparable inside the miter.
        let mut registry = GeneratorRegistry::new();
        let rep_one = preprocess(&dag_one, inputs, &mut registry, &mut self.stats)?;
        let rep_two = preprocess(&dag_two, inputs, &mut registry, &mut self.stats)?;
        info!(
            elapsed_ms = self.stats.preproc_time_ms,
            "preprocessing complete"
        );

        let mut instance = SatInstance::new();
        encode_miter(&rep_one, &rep_two, &registry, &mut instance, &mut self.stats);
        info!(
            elapsed_ms = self.stats.construction_time_ms,
            "constraint construction complete"
        );

        let satisfiable = self.solve(&instance)?;
        let equal = !satisfiable;
        self.stats.equivalent = equal;
        Ok(equal)
    }

    /// Check satisfiability of a single circuit's encoding and record the
    /// verdict in the statistics.
    pub fn check_satisfiability(
        &mut self,
        circuit: &Circuit,
        inputs: &[String],
    ) -> SatResult<bool> {
        ensure_clifford(circuit)?;

        self.stats.num_input_states = inputs.len() as u64;
        self.stats.num_qubits = circuit.num_qubits() as u64;

        let dag = circuit.layered();
        let mut registry = GeneratorRegistry::new();
        let rep = preprocess(&dag, inputs, &mut registry, &mut self.stats)?;
        info!(
            elapsed_ms = self.stats.preproc_time_ms,
            "preprocessing complete"
        );

        let mut instance = SatInstance::new();
        encode_single(&rep, &registry, &mut instance, &mut self.stats);
        info!(
            elapsed_ms = self.stats.construction_time_ms,
            "constraint construction complete"
        );

        self.solve(&instance)
    }

    fn solve(&mut self, instance: &SatInstance) -> SatResult<bool> {
        debug!("starting solver");
        let start = Instant::now();
        let verdict = instance.check();
        self.stats.solving_time_ms = start.elapsed().as_millis() as u64;
        self.stats.solver_stats = instance.statistics();
        match verdict {
            Verdict::Satisfiable => {
                self.stats.satisfiable = true;
                Ok(true)
            }
            Verdict::Unsatisfiable => Ok(false),
            Verdict::Unknown => Err(SatError::SolverUnknown),
        }
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Consume the checker and return its statistics.
    pub fn into_stats(self) -> Statistics {
        self.stats
    }
}

impl Default for EquivalenceChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Refuse circuits with gates outside the accepted Clifford alphabet.
fn ensure_clifford(circuit: &Circuit) -> SatResult<()> {
    for inst in circuit.operations() {
        if !inst.gate.is_clifford_supported() {
            return Err(SatError::InvalidCircuit {
                gate: inst.name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::QubitId;

    #[test]
    fn test_non_clifford_rejected_before_solving() {
        let mut clifford = Circuit::with_size("h", 1);
        clifford.h(QubitId(0)).unwrap();
        let mut magic = Circuit::with_size("t", 1);
        magic.t(QubitId(0)).unwrap();

        let mut checker = EquivalenceChecker::new();
        let err = checker.test_equal(&clifford, &magic, &[]).unwrap_err();
        assert!(matches!(err, SatError::InvalidCircuit { .. }));

        // Rejection happens before preprocessing or solving.
        assert_eq!(checker.stats().num_gates, 0);
        assert!(checker.stats().solver_stats.is_empty());
    }

    #[test]
    fn test_empty_circuit_rejected() {
        let empty = Circuit::with_size("empty", 1);
        let mut other = Circuit::with_size("h", 1);
        other.h(QubitId(0)).unwrap();

        let mut checker = EquivalenceChecker::new();
        let err = checker.test_equal(&empty, &other, &[]).unwrap_err();
        assert!(matches!(err, SatError::EmptyCircuit));

        let err = checker.test_equal(&other, &empty, &[]).unwrap_err();
        assert!(matches!(err, SatError::EmptyCircuit));
    }
}
