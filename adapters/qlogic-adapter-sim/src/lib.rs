//! Statevector backend for qlogic circuits.
//!
//! Circuits here have two or three qubits, so the simulator keeps the full
//! state and applies gates in place. `<Z>` comes straight from the
//! amplitudes, or from seeded sampling when a shot count is set. The qubit
//! limit only guards against accidentally wide circuits.
//!
//! # Example
//!
//! ```rust
//! use qlogic_adapter_sim::StatevectorSimulator;
//! use qlogic_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("flip", 2, 0);
//! circuit.x(QubitId(0)).unwrap();
//!
//! let mut sim = StatevectorSimulator::new();
//! let z = sim.expval_z(&circuit, QubitId(0)).unwrap();
//! assert!((z + 1.0).abs() < 1e-12);
//! ```

mod error;
mod simulator;
mod statevector;

pub use error::{SimError, SimResult};
pub use simulator::{DEFAULT_MAX_QUBITS, StatevectorSimulator};
pub use statevector::Statevector;
