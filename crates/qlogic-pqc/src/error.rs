//! Error types for circuit configuration and training.

use qlogic_adapter_sim::SimError;
use qlogic_ir::IrError;
use thiserror::Error;

use crate::config::Variant;

/// Errors raised while building or loading a [`CircuitConfig`](crate::CircuitConfig).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Learning rate must be finite and positive.
    #[error("Invalid learning rate {0}: must be finite and > 0")]
    InvalidLearningRate(f64),

    /// At least one optimization step is required.
    #[error("Invalid max_steps {0}: must be > 0")]
    InvalidMaxSteps(usize),

    /// At least one ansatz block is required.
    #[error("Invalid num_blocks {0}: must be >= 1")]
    InvalidNumBlocks(usize),

    /// A shot count of zero cannot estimate anything.
    #[error("Invalid shots 0: use a positive count, or omit for exact expectation values")]
    InvalidShots,

    /// Convergence tolerance must be finite and non-negative.
    #[error("Invalid convergence tolerance {0}: must be finite and >= 0")]
    InvalidTolerance(f64),

    /// Encoding scale must be finite.
    #[error("Invalid angle scale {0}: must be finite")]
    InvalidScale(f64),

    /// Encoding bias must be finite.
    #[error("Invalid angle bias {0}: must be finite")]
    InvalidBias(f64),

    /// Encoding axis is not one of RX, RY, RZ.
    #[error("Unknown rotation axis '{0}'. Available: RX, RY, RZ")]
    UnknownAxis(String),

    /// Entangler is not one of the supported two-qubit gates.
    #[error("Unknown entangler '{0}'. Available: CNOT, CZ, ISWAP, SWAP")]
    UnknownEntangler(String),

    /// Entangler wires must be distinct and within the register.
    #[error("Invalid entangle order ({control}, {target}): wires must be distinct and in {{0, 1}}")]
    InvalidEntangleOrder {
        /// Control wire.
        control: usize,
        /// Target wire.
        target: usize,
    },

    /// Unknown model variant name.
    #[error("Unknown variant '{0}'. Available: plain, angle, entangled")]
    UnknownVariant(String),

    /// Unknown logic gate name.
    #[error("Unknown logic gate '{0}'. Available: AND, OR, NAND, NOR, XOR, XNOR")]
    UnknownGate(String),

    /// A YAML key that the selected variant does not define.
    #[error("Unknown field '{field}' for the {variant} variant")]
    UnknownField {
        /// The offending key.
        field: String,
        /// Variant named by the document's tag.
        variant: Variant,
    },

    /// YAML parse or validation failure.
    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building, evaluating, or training a circuit model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PqcError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    /// Parameter tensor has the wrong shape for the model.
    #[error("Parameter shape mismatch: expected {expected:?}, got {got:?}")]
    ParameterShape {
        /// Shape the model requires.
        expected: [usize; 3],
        /// Shape that was supplied.
        got: Vec<usize>,
    },

    /// Input vector does not match the register width.
    #[error("Expected {expected} input bits, got {got}")]
    InputLength {
        /// Register width.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Training data set has no rows.
    #[error("Dataset is empty")]
    EmptyDataset,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for model operations.
pub type PqcResult<T> = Result<T, PqcError>;
