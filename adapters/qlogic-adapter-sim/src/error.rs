//! Simulator errors.

use qlogic_ir::QubitId;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The circuit is wider than the simulator allows.
    #[error("{num_qubits}-qubit circuit exceeds the {max_qubits}-qubit simulator limit")]
    TooManyQubits { num_qubits: usize, max_qubits: usize },

    #[error("qubit {qubit} outside a {num_qubits}-qubit state")]
    QubitOutOfRange { qubit: QubitId, num_qubits: usize },

    /// Gate applied with the wrong number of wires.
    #[error("cannot simulate {0}")]
    UnsupportedInstruction(String),

    #[error("shot count must be positive")]
    ZeroShots,
}

pub type SimResult<T> = Result<T, SimError>;
