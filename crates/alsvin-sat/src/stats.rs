//! Query statistics with a fixed JSON schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Counters and timings collected across one equivalence or satisfiability
/// query.
///
/// The serialized field names are a compatibility contract with existing
/// tooling and must not change; in particular the solver statistics map keeps
/// its historical `z3map` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of gate visits during preprocessing.
    #[serde(rename = "numGates")]
    pub num_gates: u64,
    /// Qubit count of the checked circuit(s).
    #[serde(rename = "nrOfQubits")]
    pub num_qubits: u64,
    /// Number of bit-vector variables created by the encoder.
    #[serde(rename = "numSatVarsCreated")]
    pub num_sat_vars: u64,
    /// Number of distinct generators interned across the query.
    #[serde(rename = "numGenerators")]
    pub num_generators: u64,
    /// Number of functional (transition) constraints emitted.
    #[serde(rename = "numFuncConstr")]
    pub num_functional_constraints: u64,
    /// Largest circuit depth seen by the preprocessor.
    #[serde(rename = "circDepth")]
    pub circuit_depth: u64,
    /// Number of distinct input states supplied by the caller.
    #[serde(rename = "numInputs")]
    pub num_input_states: u64,
    /// Whether the miter query proved the circuits equivalent.
    #[serde(rename = "equivalent")]
    pub equivalent: bool,
    /// Whether the last solver run found a satisfying assignment.
    #[serde(rename = "satisfiable")]
    pub satisfiable: bool,
    /// Accumulated preprocessing time in milliseconds.
    #[serde(rename = "preprocTime")]
    pub preproc_time_ms: u64,
    /// Solver run time in milliseconds.
    #[serde(rename = "solvingTime")]
    pub solving_time_ms: u64,
    /// Constraint construction time in milliseconds.
    #[serde(rename = "satConstructionTime")]
    pub construction_time_ms: u64,
    /// Solver statistics by name.
    #[serde(rename = "z3map")]
    pub solver_stats: BTreeMap<String, f64>,
}

impl Statistics {
    /// Serialize into the fixed JSON schema.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Deserialize from the fixed JSON schema.
    pub fn from_json(value: &serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value.clone())
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} gates, {} qubits, {} sat variables, {} generators, \
             {} functional constraints, {} depth, {} input states, \
             equivalent: {}, satisfiable: {}, \
             {} ms preprocessing, {} ms solving, {} ms construction",
            self.num_gates,
            self.num_qubits,
            self.num_sat_vars,
            self.num_generators,
            self.num_functional_constraints,
            self.circuit_depth,
            self.num_input_states,
            self.equivalent,
            self.satisfiable,
            self.preproc_time_ms,
            self.solving_time_ms,
            self.construction_time_ms,
        )
    }
}
