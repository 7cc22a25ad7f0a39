//! Circuit templates for the three model variants.
//!
//! An [`Ansatz`] writes the data-encoding stage and one parameterized block
//! into a [`Circuit`]. [`CircuitModel`](crate::CircuitModel) owns one, picked
//! from the config variant, and stacks `num_blocks` blocks after the encoding.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use qlogic_ir::{Circuit, IrResult, QubitId};

use crate::config::{CircuitConfig, EncodingAxis, Entangler};
use crate::error::{PqcError, PqcResult};
use crate::gates::NUM_INPUTS;
use crate::params::{ALPHA, BETA, BlockParams, LAMBDA, PHI, THETA};

/// Parameters per wire for the plain ansatz.
pub const PLAIN_PARAMS_PER_WIRE: usize = 3;
/// Parameters per wire for the angle-encoded and entangled ansätze.
pub const EXTENDED_PARAMS_PER_WIRE: usize = 5;

/// Qubit for wire index `w`.
pub(crate) fn wire(w: usize) -> QubitId {
    QubitId(w as u32)
}

/// Whether an input value encodes bit 1.
pub(crate) fn bit_set(value: f64) -> bool {
    value > 0.5
}

/// Encoding stage plus a repeatable parameterized block.
pub trait Ansatz: fmt::Debug + Send + Sync {
    /// Width `k` of each wire row in the parameter tensor.
    fn params_per_wire(&self) -> usize;

    /// Write the data-encoding gates for `inputs`.
    fn encode(&self, circuit: &mut Circuit, inputs: &[f64]) -> IrResult<()>;

    /// Write one block. `params` has shape `[2, k]`.
    fn block(&self, circuit: &mut Circuit, params: BlockParams<'_>, inputs: &[f64])
    -> PqcResult<()>;
}

/// Choose the ansatz for a config variant.
pub fn ansatz_for(config: &CircuitConfig) -> Box<dyn Ansatz> {
    match config {
        CircuitConfig::Plain(_) => Box::new(BasisAnsatz),
        CircuitConfig::Angle(c) => Box::new(AngleAnsatz {
            axis: c.axis(),
            scale: c.scale(),
            bias: c.bias(),
        }),
        CircuitConfig::Entangled(c) => Box::new(EntangledAnsatz {
            entangler: c.entangler(),
            control: c.entangle_order().0,
            target: c.entangle_order().1,
            mirror: c.mirror(),
        }),
    }
}

fn basis_encode(circuit: &mut Circuit, inputs: &[f64]) -> IrResult<()> {
    for (w, &value) in inputs.iter().enumerate() {
        if bit_set(value) {
            circuit.x(wire(w))?;
        }
    }
    Ok(())
}

/// RY(θ) RZ(φ) RY(λ) on one wire.
fn euler_rotation(circuit: &mut Circuit, w: usize, params: BlockParams<'_>) -> IrResult<()> {
    circuit
        .ry(params[[w, THETA]], wire(w))?
        .rz(params[[w, PHI]], wire(w))?
        .ry(params[[w, LAMBDA]], wire(w))?;
    Ok(())
}

fn check_width(params: BlockParams<'_>, k: usize) -> PqcResult<()> {
    if params.shape() != [NUM_INPUTS, k] {
        return Err(PqcError::ParameterShape {
            expected: [1, NUM_INPUTS, k],
            got: params.shape().to_vec(),
        });
    }
    Ok(())
}

/// Basis encoding followed by single-qubit rotations. No entanglement.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisAnsatz;

impl Ansatz for BasisAnsatz {
    fn params_per_wire(&self) -> usize {
        PLAIN_PARAMS_PER_WIRE
    }

    fn encode(&self, circuit: &mut Circuit, inputs: &[f64]) -> IrResult<()> {
        basis_encode(circuit, inputs)
    }

    fn block(
        &self,
        circuit: &mut Circuit,
        params: BlockParams<'_>,
        _inputs: &[f64],
    ) -> PqcResult<()> {
        check_width(params, PLAIN_PARAMS_PER_WIRE)?;
        for w in 0..NUM_INPUTS {
            euler_rotation(circuit, w, params)?;
        }
        Ok(())
    }
}

/// Each input becomes a rotation angle `scale * bit + bias`; blocks end in
/// two fixed CRX(π/2) gates, one in each direction.
#[derive(Debug, Clone, Copy)]
pub struct AngleAnsatz {
    /// Encoding rotation axis.
    pub axis: EncodingAxis,
    /// Angle per unit of input.
    pub scale: f64,
    /// Angle offset.
    pub bias: f64,
}

impl Ansatz for AngleAnsatz {
    fn params_per_wire(&self) -> usize {
        EXTENDED_PARAMS_PER_WIRE
    }

    fn encode(&self, circuit: &mut Circuit, inputs: &[f64]) -> IrResult<()> {
        for (w, &value) in inputs.iter().enumerate() {
            let angle = self.scale * value + self.bias;
            circuit.gate(self.axis.gate(angle), [wire(w)])?;
        }
        Ok(())
    }

    fn block(
        &self,
        circuit: &mut Circuit,
        params: BlockParams<'_>,
        _inputs: &[f64],
    ) -> PqcResult<()> {
        check_width(params, EXTENDED_PARAMS_PER_WIRE)?;
        for w in 0..NUM_INPUTS {
            euler_rotation(circuit, w, params)?;
            circuit
                .rx(params[[w, ALPHA]], wire(w))?
                .rz(params[[w, BETA]], wire(w))?;
        }
        circuit
            .crx(FRAC_PI_2, wire(0), wire(1))?
            .crx(FRAC_PI_2, wire(1), wire(0))?;
        Ok(())
    }
}

/// Basis encoding, input re-uploading inside every block, and a
/// configurable two-qubit entangler.
#[derive(Debug, Clone, Copy)]
pub struct EntangledAnsatz {
    /// Entangling gate.
    pub entangler: Entangler,
    /// Control wire.
    pub control: usize,
    /// Target wire.
    pub target: usize,
    /// Repeat the entangler with wires swapped.
    pub mirror: bool,
}

impl Ansatz for EntangledAnsatz {
    fn params_per_wire(&self) -> usize {
        EXTENDED_PARAMS_PER_WIRE
    }

    fn encode(&self, circuit: &mut Circuit, inputs: &[f64]) -> IrResult<()> {
        basis_encode(circuit, inputs)
    }

    fn block(
        &self,
        circuit: &mut Circuit,
        params: BlockParams<'_>,
        inputs: &[f64],
    ) -> PqcResult<()> {
        check_width(params, EXTENDED_PARAMS_PER_WIRE)?;
        let bit0 = inputs.first().copied().is_some_and(bit_set);
        let bit1 = inputs.get(1).copied().is_some_and(bit_set);
        for w in 0..NUM_INPUTS {
            if bit0 {
                circuit.ry(params[[w, ALPHA]], wire(w))?;
            }
            if bit1 {
                circuit.ry(params[[w, BETA]], wire(w))?;
            }
            euler_rotation(circuit, w, params)?;
        }
        let gate = self.entangler.gate();
        circuit.gate(gate, [wire(self.control), wire(self.target)])?;
        if self.mirror {
            circuit.gate(gate, [wire(self.target), wire(self.control)])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AngleConfig, EntangledConfig, PqcConfig};
    use ndarray::Array2;
    use qlogic_ir::StandardGate;

    fn names(circuit: &Circuit) -> Vec<&'static str> {
        circuit.instructions().map(|i| i.name()).collect()
    }

    fn build(ansatz: &dyn Ansatz, inputs: &[f64]) -> Circuit {
        let mut circuit = Circuit::with_size("t", 2, 1);
        let params = Array2::<f64>::zeros((2, ansatz.params_per_wire()));
        ansatz.encode(&mut circuit, inputs).unwrap();
        ansatz.block(&mut circuit, params.view(), inputs).unwrap();
        circuit
    }

    #[test]
    fn test_selection() {
        let plain = ansatz_for(&PqcConfig::default().into());
        assert_eq!(plain.params_per_wire(), 3);
        let angle = ansatz_for(&AngleConfig::default().into());
        assert_eq!(angle.params_per_wire(), 5);
        let ent = ansatz_for(&EntangledConfig::default().into());
        assert_eq!(ent.params_per_wire(), 5);
    }

    #[test]
    fn test_basis_layout() {
        let c = build(&BasisAnsatz, &[1.0, 0.0]);
        assert_eq!(names(&c), vec!["x", "ry", "rz", "ry", "ry", "rz", "ry"]);
    }

    #[test]
    fn test_angle_layout() {
        let ansatz = AngleAnsatz {
            axis: EncodingAxis::Rx,
            scale: 2.0,
            bias: 0.5,
        };
        let c = build(&ansatz, &[1.0, 0.0]);
        let gates: Vec<_> = c.instructions().filter_map(|i| i.as_gate()).collect();
        assert_eq!(gates[0], &StandardGate::Rx(2.5));
        assert_eq!(gates[1], &StandardGate::Rx(0.5));
        // 2 encodings, 5 rotations per wire, 2 CRX
        assert_eq!(gates.len(), 2 + 10 + 2);
        assert_eq!(gates[12], &StandardGate::CRx(FRAC_PI_2));
        assert_eq!(gates[13], &StandardGate::CRx(FRAC_PI_2));
    }

    #[test]
    fn test_entangled_reuploading() {
        let ansatz = EntangledAnsatz {
            entangler: Entangler::Cz,
            control: 1,
            target: 0,
            mirror: false,
        };
        assert_eq!(
            names(&build(&ansatz, &[0.0, 0.0])),
            vec!["ry", "rz", "ry", "ry", "rz", "ry", "cz"]
        );
        // x on both wires, then RY(α) RY(β) ahead of each wire's rotations
        let both = build(&ansatz, &[1.0, 1.0]);
        assert_eq!(both.num_ops(), 2 + 2 * 5 + 1);
    }

    #[test]
    fn test_entangled_mirror() {
        let ansatz = EntangledAnsatz {
            entangler: Entangler::Cnot,
            control: 0,
            target: 1,
            mirror: true,
        };
        let c = build(&ansatz, &[0.0, 1.0]);
        let two_qubit: Vec<_> = c
            .instructions()
            .filter(|i| i.qubits.len() == 2)
            .map(|i| i.qubits.clone())
            .collect();
        assert_eq!(
            two_qubit,
            vec![vec![wire(0), wire(1)], vec![wire(1), wire(0)]]
        );
    }

    #[test]
    fn test_block_width_checked() {
        let mut circuit = Circuit::with_size("t", 2, 1);
        let params = Array2::<f64>::zeros((2, 3));
        let ansatz = AngleAnsatz {
            axis: EncodingAxis::Ry,
            scale: 1.0,
            bias: 0.0,
        };
        assert!(matches!(
            ansatz.block(&mut circuit, params.view(), &[0.0, 0.0]),
            Err(PqcError::ParameterShape { .. })
        ));
    }
}
