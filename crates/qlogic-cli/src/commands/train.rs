//! Train command implementation.

use anyhow::Result;
use console::style;

use qlogic_pqc::{REPORT_INPUT, display_report, log_result, train_gate};

use super::common::{OverrideArgs, parse_gate, resolve_config};

/// Train one gate and print its summary and circuit diagram.
pub fn execute(
    gate: &str,
    variant: Option<&str>,
    config: Option<&str>,
    overrides: &OverrideArgs,
) -> Result<()> {
    let gate = parse_gate(gate)?;
    let config = resolve_config(variant, config, overrides)?;
    let base = config.base();

    println!(
        "{} Training {} with the {} circuit ({} blocks, up to {} steps, {})",
        style("→").cyan().bold(),
        style(gate).green(),
        style(config.variant()).yellow(),
        base.num_blocks(),
        base.max_steps(),
        match base.shots() {
            Some(shots) => format!("{shots} shots"),
            None => "exact".to_string(),
        }
    );

    let result = train_gate(gate, &config)?;
    log_result(&result, &config);
    display_report(&result, REPORT_INPUT)?;
    Ok(())
}
