//! Error types for the equivalence engine.

use thiserror::Error;

/// Errors that can occur while checking circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SatError {
    /// The circuit contains a gate outside the accepted Clifford alphabet.
    #[error("circuit contains unsupported gate '{gate}'; only Clifford gates are accepted")]
    InvalidCircuit {
        /// Name of the offending gate.
        gate: String,
    },

    /// An input circuit has no gates.
    #[error("both circuits must be non-empty")]
    EmptyCircuit,

    /// The solver gave up without a sat/unsat verdict.
    #[error("solver returned no verdict")]
    SolverUnknown,

    /// An input-state string contains a character outside `{z, Z, x, X, y, Y}`.
    #[error("invalid input state character '{symbol}' at position {position}")]
    InvalidInputState {
        /// Index of the offending character.
        position: usize,
        /// The offending character.
        symbol: char,
    },
}

/// Result type for engine operations.
pub type SatResult<T> = Result<T, SatError>;
