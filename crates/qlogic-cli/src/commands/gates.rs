//! Gates command implementation.

use console::style;

use qlogic_pqc::{LogicGate, NUM_INPUTS, print_section, truth_table_inputs};

/// Print the truth table of every gate.
pub fn execute() {
    let rows = truth_table_inputs(NUM_INPUTS);
    for gate in LogicGate::ALL {
        print_section(gate.name());
        println!("  {}", style(" a  b | out").dim());
        for bits in &rows {
            println!("  {:>2} {:>2} | {:>3}", bits[0], bits[1], gate.apply(bits[0], bits[1]));
        }
    }
}
