//! Draw command implementation.

use anyhow::Result;

use qlogic_ir::draw;
use qlogic_pqc::{CircuitModel, print_info, print_section};

use super::common::{OverrideArgs, parse_gate, parse_input, resolve_config};

/// Draw the full circuit of a freshly initialized model for one input row.
pub fn execute(
    gate: &str,
    variant: Option<&str>,
    config: Option<&str>,
    input: &str,
    fold: usize,
) -> Result<()> {
    let gate = parse_gate(gate)?;
    let bits = parse_input(input)?;
    let config = resolve_config(variant, config, &OverrideArgs::default())?;
    let model = CircuitModel::new(config)?;

    let inputs = bits.map(f64::from);
    let circuit = model.circuit(&inputs, model.params())?;

    print_section(&format!(
        "[{gate}] {} circuit (input ({}, {}))",
        model.variant(),
        bits[0],
        bits[1]
    ));
    print_info(&format!(
        "{} qubits, {} gates, depth {}, untrained parameters",
        circuit.num_qubits(),
        circuit.gate_count(),
        circuit.depth()
    ));
    println!("{}", draw(&circuit, fold));
    Ok(())
}
