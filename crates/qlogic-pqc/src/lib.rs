//! Parameterized quantum circuits that learn classical logic gates.
//!
//! Each model is a two-qubit circuit whose `<Z>` on qubit 0 is read as the
//! probability that a gate outputs 1. Parameters are trained with Adam on
//! the four truth-table rows, using parameter-shift gradients computed on
//! the local statevector simulator.
//!
//! Three architectures are available, selected by [`CircuitConfig`]:
//!
//! - **Plain**: basis encoding, single-qubit rotations only
//! - **Angle**: inputs become rotation angles; blocks end in two CRX gates
//! - **Entangled**: basis encoding, inputs re-uploaded in every block, and a
//!   configurable entangler (CNOT, CZ, iSWAP, SWAP)
//!
//! # Example
//!
//! ```rust
//! use qlogic_pqc::{EntangledConfig, LogicGate, train_gate};
//!
//! let config = EntangledConfig::builder()
//!     .num_blocks(1)
//!     .max_steps(5)
//!     .build()
//!     .unwrap();
//! let result = train_gate(LogicGate::Xor, &config.into()).unwrap();
//!
//! assert_eq!(result.targets, vec![0, 1, 1, 0]);
//! assert!(result.loss_history.len() <= 5);
//! ```

pub mod ansatz;
pub mod config;
pub mod error;
pub mod gates;
pub mod model;
pub mod optimizer;
pub mod params;
pub mod report;
pub mod workflow;

pub use ansatz::{Ansatz, AngleAnsatz, BasisAnsatz, EntangledAnsatz};
pub use config::{
    AngleConfig, AngleConfigBuilder, CircuitConfig, ConfigOverrides, EncodingAxis,
    EntangledConfig, EntangledConfigBuilder, Entangler, PqcConfig, PqcConfigBuilder, Variant,
};
pub use error::{ConfigError, ConfigResult, PqcError, PqcResult};
pub use gates::{
    Dataset, LogicGate, NUM_INPUTS, Sample, build_dataset, gate_function, truth_table_inputs,
};
pub use model::{CircuitModel, Evaluation, expval_to_prob};
pub use optimizer::{Adam, AdamConfig};
pub use params::{ParameterTensor, init_params};
pub use report::{REPORT_FOLD, build_quantum_circuit, display_report, render_report};
pub use workflow::{
    REPORT_INPUT, TrainingResult, default_config, log_result, run_all_experiments,
    run_angle_experiments, run_entangled_experiments, run_experiments, summary_lines, train_gate,
};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for batch training.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a banner header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a section title.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a labelled value.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
