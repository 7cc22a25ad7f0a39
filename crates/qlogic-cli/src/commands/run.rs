//! Run command implementation.

use anyhow::Result;
use console::style;

use qlogic_pqc::{
    LogicGate, REPORT_INPUT, create_progress_bar, display_report, log_result, print_header,
    print_result, print_success, run_experiments,
};

use super::common::{OverrideArgs, resolve_config};

/// Train the selected variant on every gate.
pub fn execute(variant: Option<&str>, config: Option<&str>, overrides: &OverrideArgs) -> Result<()> {
    let config = resolve_config(variant, config, overrides)?;
    print_header(&format!("{} circuit on all gates", config.variant().label()));

    let pb = create_progress_bar(LogicGate::ALL.len() as u64, "training");
    let results = run_experiments(&config, &LogicGate::ALL, |result| {
        pb.suspend(|| {
            log_result(result, &config);
            display_report(result, REPORT_INPUT)
        })?;
        pb.inc(1);
        Ok(())
    })?;
    pb.finish_and_clear();

    println!();
    for result in &results {
        let status = if result.is_success() {
            style("ok").green()
        } else {
            style("limited").yellow()
        };
        print_result(
            result.gate.name(),
            format!(
                "{status} ({:.1}%, loss {:.6}, {} steps)",
                result.accuracy * 100.0,
                result.final_loss,
                result.loss_history.len()
            ),
        );
    }
    let learned = results.iter().filter(|r| r.is_success()).count();
    print_success(&format!("{learned}/{} gates learned", results.len()));
    Ok(())
}
