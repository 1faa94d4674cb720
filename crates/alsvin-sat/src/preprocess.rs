//! Symbolic circuit preprocessing.
//!
//! Drives a bank of stabilizer tableaux, one per chosen input state, through
//! the layers of a circuit and records how the interned generator of each
//! state moves from layer to layer. The resulting transition maps are all the
//! encoder needs; the tableaux themselves are dropped afterwards.

use std::collections::BTreeMap;
use std::time::Instant;

use alsvin_ir::{LayeredDag, StandardGate};
use tracing::{debug, trace};

use crate::error::SatResult;
use crate::registry::{GeneratorId, GeneratorRegistry};
use crate::stats::Statistics;
use crate::tableau::{GeneratorKey, StabilizerTableau};

/// Per-circuit output of preprocessing.
#[derive(Debug, Clone, Default)]
pub struct CircuitRepresentation {
    /// Generators seen while preprocessing this circuit, by id.
    pub id_generator_map: BTreeMap<GeneratorId, GeneratorKey>,
    /// One map per layer; entry `prev -> next` records that a state whose
    /// generator was `prev` before the layer carries `next` after it.
    pub generator_mappings: Vec<BTreeMap<GeneratorId, GeneratorId>>,
}

impl CircuitRepresentation {
    /// Number of layers this circuit was preprocessed into.
    pub fn depth(&self) -> usize {
        self.generator_mappings.len()
    }
}

/// A tableau together with the registry id it had after the previous layer.
struct TrackedState {
    tableau: StabilizerTableau,
    prev_gen: GeneratorId,
}

/// Simulate the circuit on every input state and intern the per-layer
/// generators into `registry`.
///
/// An empty `inputs` slice means a single all-zero input state. The first
/// call on a fresh registry freezes the input watermark, so both circuits of
/// a miter query must share one registry instance.
pub fn preprocess(
    dag: &LayeredDag,
    inputs: &[String],
    registry: &mut GeneratorRegistry,
    stats: &mut Statistics,
) -> SatResult<CircuitRepresentation> {
    let start = Instant::now();
    let num_qubits = dag.num_qubits();
    let depth = dag.depth();
    stats.circuit_depth = stats.circuit_depth.max(depth as u64);

    let mut representation = CircuitRepresentation {
        id_generator_map: BTreeMap::new(),
        generator_mappings: vec![BTreeMap::new(); depth],
    };

    let mut tableaux = Vec::new();
    if inputs.is_empty() {
        tableaux.push(StabilizerTableau::new(num_qubits));
    } else {
        for input in inputs {
            tableaux.push(StabilizerTableau::with_input(num_qubits, input)?);
        }
    }

    // Intern the level-0 generator of every input state.
    let mut states: Vec<TrackedState> = Vec::with_capacity(tableaux.len());
    for tableau in tableaux {
        let key = tableau.level_generator();
        let (id, _) = registry.intern(key.clone());
        representation.id_generator_map.insert(id, key);
        states.push(TrackedState {
            tableau,
            prev_gen: id,
        });
    }
    registry.seal_inputs();

    for layer in 0..depth {
        for qubit in 0..num_qubits {
            let Some(inst) = dag.gate_at(qubit, layer) else {
                continue;
            };
            stats.num_gates += 1;

            let Some(&target) = inst.targets().first() else {
                continue;
            };
            let target = target.index();

            match inst.gate {
                StandardGate::H => {
                    for state in &mut states {
                        state.tableau.apply_h(target);
                    }
                }
                StandardGate::S => {
                    for state in &mut states {
                        state.tableau.apply_s(target);
                    }
                }
                StandardGate::Sdg => {
                    for state in &mut states {
                        for _ in 0..3 {
                            state.tableau.apply_s(target);
                        }
                    }
                }
                StandardGate::Z => {
                    for state in &mut states {
                        state.tableau.apply_h(target);
                        state.tableau.apply_s(target);
                        state.tableau.apply_s(target);
                        state.tableau.apply_h(target);
                    }
                }
                StandardGate::X => {
                    for state in &mut states {
                        state.tableau.apply_h(target);
                        state.tableau.apply_s(target);
                        state.tableau.apply_s(target);
                    }
                }
                StandardGate::Y => {
                    for state in &mut states {
                        state.tableau.apply_h(target);
                        state.tableau.apply_s(target);
                        state.tableau.apply_s(target);
                        state.tableau.apply_s(target);
                    }
                }
                StandardGate::CX => {
                    // The layered DAG shows a CNOT from both of its wires;
                    // apply it only when visiting the control.
                    let control = inst.controls()[0].index();
                    if qubit == control {
                        for state in &mut states {
                            state.tableau.apply_cnot(control, target);
                        }
                    }
                }
                StandardGate::I => {}
                StandardGate::T | StandardGate::Tdg | StandardGate::CZ | StandardGate::Swap => {
                    trace!(gate = inst.name(), "skipping unsupported operation");
                }
            }
        }

        // Intern the post-layer generator of every state and record the
        // transition keyed by the pre-layer id. States that collapsed to the
        // same id overwrite each other with the identical pair, because
        // Clifford updates are deterministic in the generator.
        for state in &mut states {
            let key = state.tableau.level_generator();
            let (id, _) = registry.intern(key.clone());
            representation.id_generator_map.insert(id, key);
            representation.generator_mappings[layer].insert(state.prev_gen, id);
            state.prev_gen = id;
        }
    }

    stats.preproc_time_ms += start.elapsed().as_millis() as u64;
    debug!(
        depth,
        states = inputs.len().max(1),
        generators = registry.len(),
        "preprocessing finished"
    );
    Ok(representation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_ir::{Circuit, QubitId};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_inputs_mean_single_zero_state() {
        let mut circuit = Circuit::with_size("id", 1);
        circuit.i(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep = preprocess(&circuit.layered(), &[], &mut registry, &mut stats).unwrap();

        assert_eq!(rep.depth(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.input_count(), 1);
        // The identity layer maps the initial generator to itself.
        assert_eq!(
            rep.generator_mappings[0].get(&GeneratorId(0)),
            Some(&GeneratorId(0))
        );
    }

    #[test]
    fn test_gate_count_includes_both_cnot_slots() {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        preprocess(&circuit.layered(), &[], &mut registry, &mut stats).unwrap();

        // One H visit plus two CNOT visits (control and target slot).
        assert_eq!(stats.num_gates, 3);
        assert_eq!(stats.circuit_depth, 2);
    }

    #[test]
    fn test_shared_prev_id_shares_transition() {
        // Two identical input strings collapse to one tracked generator, so
        // each layer map holds a single entry.
        let mut circuit = Circuit::with_size("h", 1);
        circuit.h(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep = preprocess(
            &circuit.layered(),
            &strings(&["z", "z"]),
            &mut registry,
            &mut stats,
        )
        .unwrap();

        assert_eq!(rep.generator_mappings[0].len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_distinct_inputs_track_separately() {
        let mut circuit = Circuit::with_size("h", 1);
        circuit.h(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep = preprocess(
            &circuit.layered(),
            &strings(&["z", "x"]),
            &mut registry,
            &mut stats,
        )
        .unwrap();

        assert_eq!(registry.input_count(), 2);
        // H exchanges the Z- and X-stabilized generators.
        assert_eq!(
            rep.generator_mappings[0].get(&GeneratorId(0)),
            Some(&GeneratorId(1))
        );
        assert_eq!(
            rep.generator_mappings[0].get(&GeneratorId(1)),
            Some(&GeneratorId(0))
        );
        // No generator beyond the two inputs is ever produced.
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_watermark_frozen_by_first_circuit() {
        let mut one = Circuit::with_size("h", 1);
        one.h(QubitId(0)).unwrap();
        let mut two = Circuit::with_size("s", 1);
        two.s(QubitId(0)).unwrap().h(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        preprocess(&one.layered(), &strings(&["x"]), &mut registry, &mut stats).unwrap();
        let watermark = registry.input_count();
        preprocess(&two.layered(), &strings(&["x"]), &mut registry, &mut stats).unwrap();

        assert_eq!(registry.input_count(), watermark);
        assert!(registry.len() >= watermark);
    }

    #[test]
    fn test_every_mapped_id_is_interned() {
        let mut circuit = Circuit::with_size("mix", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .sdg(QubitId(1))
            .unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep = preprocess(
            &circuit.layered(),
            &strings(&["zz", "xx", "yY"]),
            &mut registry,
            &mut stats,
        )
        .unwrap();

        for layer in &rep.generator_mappings {
            for (&from, &to) in layer {
                assert!(registry.lookup(from).is_some());
                assert!(registry.lookup(to).is_some());
                assert!(rep.id_generator_map.contains_key(&from));
                assert!(rep.id_generator_map.contains_key(&to));
            }
        }
    }

    #[test]
    fn test_unsupported_gates_are_skipped_but_counted() {
        let mut circuit = Circuit::with_size("t", 1);
        circuit.t(QubitId(0)).unwrap();

        let mut registry = GeneratorRegistry::new();
        let mut stats = Statistics::default();
        let rep = preprocess(&circuit.layered(), &[], &mut registry, &mut stats).unwrap();

        assert_eq!(stats.num_gates, 1);
        // The tableau never moved, so the layer records a self-loop.
        assert_eq!(
            rep.generator_mappings[0].get(&GeneratorId(0)),
            Some(&GeneratorId(0))
        );
    }
}
