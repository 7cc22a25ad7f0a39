//! Text diagrams of trained circuits.
//!
//! The diagram circuit uses basis encoding and the rotation blocks with
//! input re-uploading, followed by a barrier and the readout. It omits the
//! entangling and controlled-rotation gates, so for the angle-encoded and
//! entangled variants it is an approximation of the trained circuit.

use qlogic_ir::{Circuit, ClbitId, QubitId, draw};

use crate::ansatz::{EXTENDED_PARAMS_PER_WIRE, bit_set, wire};
use crate::error::{PqcError, PqcResult};
use crate::gates::NUM_INPUTS;
use crate::params::{ALPHA, BETA, LAMBDA, PHI, ParameterTensor, THETA};
use crate::print_section;
use crate::workflow::TrainingResult;

/// Fold width of rendered diagrams.
pub const REPORT_FOLD: usize = 120;

/// Build the diagram circuit for `params` on one input row.
///
/// Tensors with fewer than five parameters per wire skip the re-uploading
/// rotations.
pub fn build_quantum_circuit(
    params: &ParameterTensor,
    inputs: &[u8],
    name: &str,
) -> PqcResult<Circuit> {
    if inputs.len() != NUM_INPUTS {
        return Err(PqcError::InputLength {
            expected: NUM_INPUTS,
            got: inputs.len(),
        });
    }
    let shape = params.shape();
    if shape[1] != NUM_INPUTS || shape[2] < 3 {
        return Err(PqcError::ParameterShape {
            expected: [shape[0], NUM_INPUTS, EXTENDED_PARAMS_PER_WIRE],
            got: shape.to_vec(),
        });
    }
    let reupload = shape[2] >= EXTENDED_PARAMS_PER_WIRE;

    let set: Vec<bool> = inputs.iter().map(|&bit| bit_set(f64::from(bit))).collect();

    let mut circuit = Circuit::with_size(name, NUM_INPUTS as u32, 1);
    for (w, _) in set.iter().enumerate().filter(|(_, on)| **on) {
        circuit.x(wire(w))?;
    }
    for block in 0..shape[0] {
        for w in 0..NUM_INPUTS {
            let p = |i: usize| params[[block, w, i]];
            if reupload && set[0] {
                circuit.ry(p(ALPHA), wire(w))?;
            }
            if reupload && set[1] {
                circuit.ry(p(BETA), wire(w))?;
            }
            circuit
                .ry(p(THETA), wire(w))?
                .rz(p(PHI), wire(w))?
                .ry(p(LAMBDA), wire(w))?;
        }
    }
    circuit.barrier_all()?.measure(QubitId(0), ClbitId(0))?;
    Ok(circuit)
}

/// Header line and diagram for a training result.
pub fn render_report(result: &TrainingResult, inputs: [u8; NUM_INPUTS]) -> PqcResult<String> {
    let name = format!("{}_PQC", result.gate);
    let circuit = build_quantum_circuit(&result.params, &inputs, &name)?;
    Ok(format!(
        "[{}] circuit diagram (input ({}, {}))\n{}",
        result.gate,
        inputs[0],
        inputs[1],
        draw(&circuit, REPORT_FOLD)
    ))
}

/// Print the report of [`render_report`] to stdout.
pub fn display_report(result: &TrainingResult, inputs: [u8; NUM_INPUTS]) -> PqcResult<()> {
    let report = render_report(result, inputs)?;
    let (header, diagram) = report.split_once('\n').unwrap_or((report.as_str(), ""));
    print_section(header);
    println!("{diagram}");
    Ok(())
}
