//! Lowering of generator-transition maps into bit-vector constraints.
//!
//! One bit-vector variable per layer boundary tracks which generator the
//! symbolic state carries at that point. Transition entries become
//! implications (satisfiability mode) or biconditionals (miter mode) between
//! `var = constant` tests, and a miter adds the equal-input / unequal-output
//! clauses across the two circuits.

use std::time::Instant;

use tracing::debug;

use crate::preprocess::CircuitRepresentation;
use crate::registry::GeneratorRegistry;
use crate::solver::{BitVec, SatInstance};
use crate::stats::Statistics;

/// Bit width needed to encode `count` generator ids, at least one bit.
fn generator_bitwidth(count: usize) -> usize {
    if count <= 2 {
        return 1;
    }
    count.next_power_of_two().trailing_zeros() as usize
}

/// Emit the layer variables and transition constraints of one circuit.
///
/// Returns the layer variables so the miter clauses can refer to the first
/// and last of them.
fn encode_transitions(
    rep: &CircuitRepresentation,
    prefix: &str,
    width: usize,
    biconditional: bool,
    blocking: Option<u64>,
    instance: &mut SatInstance,
    stats: &mut Statistics,
) -> Vec<BitVec> {
    let depth = rep.depth();
    let mut vars = Vec::with_capacity(depth + 1);
    for k in 0..=depth {
        vars.push(instance.bitvec(format!("{prefix}^{k}"), width));
        stats.num_sat_vars += 1;
    }

    for (k, layer) in rep.generator_mappings.iter().enumerate() {
        for (&from, &to) in layer {
            let lhs = instance.eq_const(&vars[k], from.value());
            let rhs = instance.eq_const(&vars[k + 1], to.value());
            if biconditional {
                instance.assert_iff(lhs, rhs);
            } else {
                instance.assert_implies(lhs, rhs);
            }
            stats.num_functional_constraints += 1;
        }
    }

    // Exclude bit patterns with no corresponding generator id.
    if let Some(bound) = blocking {
        for var in &vars {
            let in_range = instance.ult_const(var, bound);
            instance.assert(in_range);
        }
    }

    vars
}

/// Encode a single circuit in implication form for a satisfiability query.
pub fn encode_single(
    rep: &CircuitRepresentation,
    registry: &GeneratorRegistry,
    instance: &mut SatInstance,
    stats: &mut Statistics,
) {
    let start = Instant::now();
    let generator_count = registry.len();
    stats.num_generators = generator_count as u64;

    let width = generator_bitwidth(generator_count);
    let blocking = (1u128 << width > generator_count as u128).then_some(generator_count as u64);

    encode_transitions(rep, "x", width, false, blocking, instance, stats);

    stats.construction_time_ms = start.elapsed().as_millis() as u64;
    debug!(
        generators = generator_count,
        width, "encoded satisfiability instance"
    );
}

/// Encode two circuits in biconditional form and tie them into a miter.
///
/// The instance is satisfiable iff some shared input generator drives the
/// two circuits to different output generators.
pub fn encode_miter(
    rep_one: &CircuitRepresentation,
    rep_two: &CircuitRepresentation,
    registry: &GeneratorRegistry,
    instance: &mut SatInstance,
    stats: &mut Statistics,
) {
    let start = Instant::now();
    let generator_count = registry.len();
    stats.num_generators = generator_count as u64;

    let width = generator_bitwidth(generator_count);
    let blocking = (1u128 << width > generator_count as u128).then_some(generator_count as u64);

    let vars_one = encode_transitions(rep_one, "x", width, true, blocking, instance, stats);
    let vars_two = encode_transitions(rep_two, "x'", width, true, blocking, instance, stats);

    // Same symbolic input generator on both sides, diverging final
    // generators, and the input restricted to ids that denote prepared
    // input states.
    let inputs_equal = instance.eq(&vars_one[0], &vars_two[0]);
    instance.assert(inputs_equal);

    let outputs_equal = instance.eq(&vars_one[vars_one.len() - 1], &vars_two[vars_two.len() - 1]);
    instance.assert(!outputs_equal);

    let input_count = registry.input_count() as u64;
    let one_in_range = instance.ult_const(&vars_one[0], input_count);
    instance.assert(one_in_range);
    let two_in_range = instance.ult_const(&vars_two[0], input_count);
    instance.assert(two_in_range);

    stats.construction_time_ms = start.elapsed().as_millis() as u64;
    debug!(
        generators = generator_count,
        width,
        input_generators = input_count,
        "encoded miter instance"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::preprocess;
    use crate::solver::Verdict;
    use alsvin_ir::{Circuit, QubitId};

    #[test]
    fn test_generator_bitwidth() {
        assert_eq!(generator_bitwidth(1), 1);
        assert_eq!(generator_bitwidth(2), 1);
        assert_eq!(generator_bitwidth(3), 2);
        assert_eq!(generator_bitwidth(4), 2);
        assert_eq!(generator_bitwidth(5), 3);
        assert_eq!(generator_bitwidth(8), 3);
        assert_eq!(generator_bitwidth(9), 4);
    }

    #[test]
    fn test_single_circuit_encoding_is_satisfiable() {
        // The implication form always has the witness assignment that walks
        // the recorded trajectory.
        let mut circuit = Circuit::with_size("walk", 1);
        circuit.h(QubitId(0)).unwrap().s(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep = preprocess(&circuit.layered(), &[], &mut registry, &mut stats).unwrap();

        let mut instance = SatInstance::new();
        encode_single(&rep, &registry, &mut instance, &mut stats);

        assert_eq!(instance.check(), Verdict::Satisfiable);
        assert_eq!(stats.num_sat_vars, 3);
        assert_eq!(stats.num_functional_constraints, 2);
        assert_eq!(stats.num_generators, registry.len() as u64);
    }

    #[test]
    fn test_miter_of_identical_circuits_is_unsat() {
        let build = || {
            let mut c = Circuit::with_size("pair", 2);
            c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
            c
        };
        let one = build();
        let two = build();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep_one = preprocess(&one.layered(), &[], &mut registry, &mut stats).unwrap();
        let rep_two = preprocess(&two.layered(), &[], &mut registry, &mut stats).unwrap();

        let mut instance = SatInstance::new();
        encode_miter(&rep_one, &rep_two, &registry, &mut instance, &mut stats);

        assert_eq!(instance.check(), Verdict::Unsatisfiable);
    }

    #[test]
    fn test_miter_of_distinct_circuits_is_sat() {
        let mut one = Circuit::with_size("h", 1);
        one.h(QubitId(0)).unwrap();
        let mut two = Circuit::with_size("s", 1);
        two.s(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep_one = preprocess(
            &one.layered(),
            &["z".to_string()],
            &mut registry,
            &mut stats,
        )
        .unwrap();
        let rep_two = preprocess(
            &two.layered(),
            &["z".to_string()],
            &mut registry,
            &mut stats,
        )
        .unwrap();

        let mut instance = SatInstance::new();
        encode_miter(&rep_one, &rep_two, &registry, &mut instance, &mut stats);

        assert_eq!(instance.check(), Verdict::Satisfiable);
    }
}
