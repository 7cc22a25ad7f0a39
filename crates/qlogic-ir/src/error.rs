//! Error types for circuit construction.

use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Errors raised while appending instructions to a circuit.
///
/// `op` is the instruction name (`"ry"`, `"measure"`, ...).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// The instruction names a qubit the circuit does not have.
    #[error("{op}: qubit {qubit} not in circuit")]
    QubitNotFound { qubit: QubitId, op: &'static str },

    /// The instruction names a classical bit the circuit does not have.
    #[error("{op}: classical bit {clbit} not in circuit")]
    ClbitNotFound { clbit: ClbitId, op: &'static str },

    /// Wrong number of qubits for the gate.
    #[error("{op} acts on {expected} qubit(s), got {got}")]
    QubitCountMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    /// The same qubit appears twice in one instruction.
    #[error("{op}: qubit {qubit} used twice")]
    DuplicateQubit { qubit: QubitId, op: &'static str },

    /// Graph invariants are broken.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
