//! Simulator front end: runs circuits and reads out expectation values.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace};

use qlogic_ir::{Circuit, QubitId};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Default upper bound on circuit width.
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Local statevector simulator.
///
/// In exact mode `<Z>` is computed from the amplitudes. With a shot count it
/// is estimated from that many samples, drawn from an RNG seeded at
/// construction so repeated runs see the same sequence.
#[derive(Debug, Clone)]
pub struct StatevectorSimulator {
    /// Maximum number of qubits supported.
    max_qubits: usize,
    /// `None` means exact expectation values.
    shots: Option<u32>,
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Create an exact simulator.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            shots: None,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Create a sampling simulator.
    pub fn with_shots(shots: u32, seed: u64) -> SimResult<Self> {
        if shots == 0 {
            return Err(SimError::ZeroShots);
        }
        Ok(Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            shots: Some(shots),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Build from an optional shot count; `None` gives an exact simulator.
    pub fn from_shots(shots: Option<u32>, seed: u64) -> SimResult<Self> {
        match shots {
            Some(n) => Self::with_shots(n, seed),
            None => Ok(Self::new()),
        }
    }

    /// Set a custom qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// The configured shot count.
    pub fn shots(&self) -> Option<u32> {
        self.shots
    }

    /// Whether expectation values are computed exactly.
    pub fn is_exact(&self) -> bool {
        self.shots.is_none()
    }

    /// Evolve |0...0⟩ through every instruction of `circuit`.
    #[instrument(level = "trace", skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &Circuit) -> SimResult<Statevector> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(SimError::TooManyQubits {
                num_qubits,
                max_qubits: self.max_qubits,
            });
        }

        let mut sv = Statevector::new(num_qubits);
        for inst in circuit.instructions() {
            sv.apply(inst)?;
        }
        trace!(ops = circuit.num_ops(), "statevector evolved");
        Ok(sv)
    }

    /// Expectation value of Pauli-Z on `qubit` after running `circuit`.
    #[instrument(level = "trace", skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn expval_z(&mut self, circuit: &Circuit, qubit: QubitId) -> SimResult<f64> {
        let sv = self.run(circuit)?;
        let Some(shots) = self.shots else {
            return sv.expectation_z(qubit);
        };

        // Validates the qubit before sampling.
        sv.expectation_z(qubit)?;
        let mask = 1usize << qubit.index();
        let mut ones = 0u32;
        for _ in 0..shots {
            if sv.sample(&mut self.rng) & mask != 0 {
                ones += 1;
            }
        }
        let zeros = shots - ones;
        let estimate = (f64::from(zeros) - f64::from(ones)) / f64::from(shots);
        trace!(shots, ones, estimate, "sampled expectation");
        Ok(estimate)
    }

    /// Sample `shots` full-register outcomes, keyed by bitstring (qubit 0 first).
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn sample_counts(
        &mut self,
        circuit: &Circuit,
        shots: u32,
    ) -> SimResult<FxHashMap<String, u32>> {
        if shots == 0 {
            return Err(SimError::ZeroShots);
        }
        let sv = self.run(circuit)?;
        let mut counts: FxHashMap<String, u32> = FxHashMap::default();
        for _ in 0..shots {
            let outcome = sv.sample(&mut self.rng);
            *counts.entry(sv.outcome_to_bitstring(outcome)).or_insert(0) += 1;
        }
        debug!(shots, distinct = counts.len(), "sampling complete");
        Ok(counts)
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}
