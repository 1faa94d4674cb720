//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// The alphabet is deliberately small: the equivalence engine only accepts
/// Clifford circuits, and every accepted single-qubit gate decomposes into
/// H and S at simulation time. Non-Clifford gates (`T`, `Tdg`) and
/// unsupported two-qubit gates (`CZ`, `Swap`) exist so that rejection paths
/// stay exercisable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
        }
    }

    /// Check whether the equivalence engine accepts this gate.
    ///
    /// Accepted are the single-qubit Cliffords `H`, `S`, `Sdg`, `X`, `Y`,
    /// `Z`, `I` and the controlled form of `X` (CNOT). `CZ` and `Swap` are
    /// Clifford gates as well but outside the engine's gate alphabet, so a
    /// circuit containing them is refused rather than silently mis-simulated.
    #[inline]
    pub fn is_clifford_supported(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::S
                | StandardGate::Sdg
                | StandardGate::CX
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::H.name(), "h");
        assert_eq!(StandardGate::Sdg.name(), "sdg");
    }

    #[test]
    fn test_clifford_acceptance() {
        assert!(StandardGate::H.is_clifford_supported());
        assert!(StandardGate::S.is_clifford_supported());
        assert!(StandardGate::Sdg.is_clifford_supported());
        assert!(StandardGate::I.is_clifford_supported());
        assert!(StandardGate::CX.is_clifford_supported());

        assert!(!StandardGate::T.is_clifford_supported());
        assert!(!StandardGate::Tdg.is_clifford_supported());
        assert!(!StandardGate::CZ.is_clifford_supported());
        assert!(!StandardGate::Swap.is_clifford_supported());
    }
}
