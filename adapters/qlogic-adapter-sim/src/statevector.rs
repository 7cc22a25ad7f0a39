//! Dense statevector and the gate kernels that act on it.

use num_complex::Complex64;
use rand::Rng;

use qlogic_ir::{Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{SimError, SimResult};

/// Row-major 2x2 unitary.
type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

fn rx(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    let c = Complex64::from(c);
    let m = Complex64::new(0.0, -s);
    [[c, m], [m, c]]
}

fn ry(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::from(c), Complex64::from(-s)],
        [Complex64::from(s), Complex64::from(c)],
    ]
}

fn rz(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// Amplitudes of an `n`-qubit register.
///
/// Bit `k` of a basis index is the value of qubit `k`, so `|q1 q0⟩ = |10⟩`
/// lives at index 2.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The all-zeros state on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self { amplitudes }
    }

    pub fn num_qubits(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply one circuit instruction.
    ///
    /// Measurements only ever close the circuits run here, so they and
    /// barriers are no-ops on the state.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        let InstructionKind::Gate(gate) = &instruction.kind else {
            return Ok(());
        };
        let wires = instruction
            .qubits
            .iter()
            .map(|&q| self.wire(q))
            .collect::<SimResult<Vec<_>>>()?;
        if wires.len() != gate.num_qubits() as usize {
            return Err(SimError::UnsupportedInstruction(format!(
                "{} on {} qubits",
                gate.name(),
                wires.len()
            )));
        }
        self.apply_gate(*gate, &wires);
        Ok(())
    }

    fn wire(&self, qubit: QubitId) -> SimResult<usize> {
        let num_qubits = self.num_qubits();
        match qubit.index() {
            k if k < num_qubits => Ok(k),
            _ => Err(SimError::QubitOutOfRange { qubit, num_qubits }),
        }
    }

    /// `wires` must already match the gate's arity.
    fn apply_gate(&mut self, gate: StandardGate, wires: &[usize]) {
        match gate {
            StandardGate::X => self.transform(wires[0], None, &PAULI_X),
            StandardGate::Rx(theta) => self.transform(wires[0], None, &rx(theta)),
            StandardGate::Ry(theta) => self.transform(wires[0], None, &ry(theta)),
            StandardGate::Rz(theta) => self.transform(wires[0], None, &rz(theta)),
            StandardGate::CX => self.transform(wires[1], Some(wires[0]), &PAULI_X),
            StandardGate::CRx(theta) => self.transform(wires[1], Some(wires[0]), &rx(theta)),
            StandardGate::CZ => self.flip_both_set(wires[0], wires[1]),
            StandardGate::Swap => self.exchange(wires[0], wires[1], ONE),
            StandardGate::ISwap => self.exchange(wires[0], wires[1], I),
        }
    }

    /// Act with `m` on `target`, restricted to the subspace where `control`
    /// (if any) is 1.
    fn transform(&mut self, target: usize, control: Option<usize>, m: &Matrix2) {
        let t = 1usize << target;
        let c = control.map_or(0, |q| 1usize << q);
        for i in (0..self.amplitudes.len()).filter(|&i| i & t == 0 && i & c == c) {
            let j = i | t;
            let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
            self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
            self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
        }
    }

    fn flip_both_set(&mut self, q1: usize, q2: usize) {
        let both = (1usize << q1) | (1usize << q2);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    /// Swap `|..1..0..⟩` with `|..0..1..⟩` on the two wires, multiplying
    /// both by `phase` (1 for SWAP, i for iSWAP).
    fn exchange(&mut self, q1: usize, q2: usize, phase: Complex64) {
        let (m1, m2) = (1usize << q1, 1usize << q2);
        for i in (0..self.amplitudes.len()).filter(|&i| i & m1 != 0 && i & m2 == 0) {
            let j = (i ^ m1) | m2;
            let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
            self.amplitudes[i] = phase * b;
            self.amplitudes[j] = phase * a;
        }
    }

    /// Born probabilities, indexed like the amplitudes.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Exact `<Z>` on `qubit`: P(0) - P(1).
    pub fn expectation_z(&self, qubit: QubitId) -> SimResult<f64> {
        let mask = 1usize << self.wire(qubit)?;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .map(|(i, a)| if i & mask == 0 { a.norm_sqr() } else { -a.norm_sqr() })
            .sum())
    }

    /// Draw one basis index from the Born distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();
        let mut acc = 0.0;
        self.amplitudes
            .iter()
            .position(|a| {
                acc += a.norm_sqr();
                r < acc
            })
            // acc can end a hair below 1.0
            .unwrap_or(self.amplitudes.len() - 1)
    }

    /// Render a basis index as bits, qubit 0 first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        (0..self.num_qubits())
            .map(|k| if (outcome >> k) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    fn evolve(num_qubits: usize, gates: &[(StandardGate, &[usize])]) -> Statevector {
        let mut sv = Statevector::new(num_qubits);
        for (gate, wires) in gates {
            sv.apply_gate(*gate, wires);
        }
        sv
    }

    fn z(sv: &Statevector, q: u32) -> f64 {
        sv.expectation_z(QubitId(q)).unwrap()
    }

    fn close(a: Complex64, re: f64, im: f64) -> bool {
        (a - Complex64::new(re, im)).norm() < 1e-10
    }

    #[test]
    fn starts_in_ground_state() {
        let sv = Statevector::new(2);
        assert_eq!(sv.num_qubits(), 2);
        assert_eq!(sv.probabilities(), vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn ry_then_cx_makes_bell_pair() {
        let sv = evolve(2, &[(StandardGate::Ry(PI / 2.0), &[0]), (StandardGate::CX, &[0, 1])]);
        let amps = sv.amplitudes();
        assert!(close(amps[0], FRAC_1_SQRT_2, 0.0));
        assert!(close(amps[1], 0.0, 0.0));
        assert!(close(amps[2], 0.0, 0.0));
        assert!(close(amps[3], FRAC_1_SQRT_2, 0.0));
    }

    #[test]
    fn x_flips_only_its_wire() {
        let sv = evolve(2, &[(StandardGate::X, &[1])]);
        assert_abs_diff_eq!(z(&sv, 0), 1.0);
        assert_abs_diff_eq!(z(&sv, 1), -1.0);
        assert!(close(sv.amplitudes()[2], 1.0, 0.0));
    }

    #[test]
    fn rotations_move_z_by_cos_theta() {
        let theta = 0.7;
        for gate in [StandardGate::Rx(theta), StandardGate::Ry(theta)] {
            let sv = evolve(1, &[(gate, &[0])]);
            assert_abs_diff_eq!(z(&sv, 0), theta.cos(), epsilon = 1e-12);
        }
        let sv = evolve(1, &[(StandardGate::Rz(theta), &[0])]);
        assert_abs_diff_eq!(z(&sv, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn controlled_rotation_waits_for_control() {
        let idle = evolve(2, &[(StandardGate::CRx(PI), &[0, 1])]);
        assert_abs_diff_eq!(z(&idle, 1), 1.0, epsilon = 1e-12);

        let fired = evolve(
            2,
            &[(StandardGate::X, &[0]), (StandardGate::CRx(PI), &[0, 1])],
        );
        assert_abs_diff_eq!(z(&fired, 1), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn swap_and_iswap_move_the_excitation() {
        let swapped = evolve(2, &[(StandardGate::X, &[1]), (StandardGate::Swap, &[0, 1])]);
        assert_abs_diff_eq!(z(&swapped, 0), -1.0, epsilon = 1e-12);
        assert!(close(swapped.amplitudes()[1], 1.0, 0.0));

        let iswapped = evolve(2, &[(StandardGate::X, &[1]), (StandardGate::ISwap, &[0, 1])]);
        assert_abs_diff_eq!(z(&iswapped, 0), -1.0, epsilon = 1e-12);
        assert!(close(iswapped.amplitudes()[1], 0.0, 1.0));
    }

    #[test]
    fn cz_negates_the_11_amplitude() {
        let sv = evolve(
            2,
            &[
                (StandardGate::X, &[0]),
                (StandardGate::X, &[1]),
                (StandardGate::CZ, &[0, 1]),
            ],
        );
        assert!(close(sv.amplitudes()[3], -1.0, 0.0));
    }

    #[test]
    fn apply_checks_wire_range() {
        let mut sv = Statevector::new(1);
        let inst = Instruction::gate(StandardGate::X, [QubitId(3)]);
        assert!(matches!(
            sv.apply(&inst),
            Err(SimError::QubitOutOfRange { num_qubits: 1, .. })
        ));
    }

    #[test]
    fn apply_checks_arity() {
        let mut sv = Statevector::new(2);
        let inst = Instruction::gate(StandardGate::CX, [QubitId(0)]);
        assert!(matches!(
            sv.apply(&inst),
            Err(SimError::UnsupportedInstruction(_))
        ));
    }

    #[test]
    fn sampling_a_basis_state_is_certain() {
        let sv = evolve(1, &[(StandardGate::X, &[0])]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| sv.sample(&mut rng) == 1));
    }

    #[test]
    fn bitstrings_list_qubit_zero_first() {
        let sv = Statevector::new(3);
        assert_eq!(sv.outcome_to_bitstring(0b001), "100");
        assert_eq!(sv.outcome_to_bitstring(0b110), "011");
    }
}
