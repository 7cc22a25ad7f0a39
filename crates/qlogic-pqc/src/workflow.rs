//! Train one model per logic gate and summarize the results.

use std::f64::consts::PI;

use console::style;
use tracing::info;

use crate::config::{
    AngleConfig, CircuitConfig, EncodingAxis, Entangler, EntangledConfig, PqcConfig, Variant,
};
use crate::error::{ConfigResult, PqcResult};
use crate::gates::{LogicGate, NUM_INPUTS, build_dataset, truth_table_inputs};
use crate::model::CircuitModel;
use crate::params::{ParameterTensor, rounded};
use crate::report::display_report;
use crate::{print_result, print_section};

/// Input row drawn after each training run.
pub const REPORT_INPUT: [u8; NUM_INPUTS] = [1, 1];

/// Outcome of training one gate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingResult {
    /// Gate that was learned.
    pub gate: LogicGate,
    /// Circuit variant used.
    pub variant: Variant,
    /// Last recorded loss, or +∞ if no step ran.
    pub final_loss: f64,
    /// Fraction of truth-table rows predicted correctly.
    pub accuracy: f64,
    /// `final_loss < convergence_tol`.
    pub converged: bool,
    /// Trained parameters.
    pub params: ParameterTensor,
    /// P(1) per truth-table row.
    pub probabilities: Vec<f64>,
    /// Thresholded predictions per row.
    pub predictions: Vec<u8>,
    /// Expected outputs per row.
    pub targets: Vec<u8>,
    /// Loss at each optimization step.
    pub loss_history: Vec<f64>,
}

impl TrainingResult {
    /// Whether every row is predicted correctly.
    pub fn is_success(&self) -> bool {
        self.accuracy == 1.0
    }
}

/// Train a fresh model for `gate` and evaluate it on the full truth table.
pub fn train_gate(gate: LogicGate, config: &CircuitConfig) -> PqcResult<TrainingResult> {
    info!(%gate, variant = %config.variant(), "training gate");
    let dataset = build_dataset(gate);
    let mut model = CircuitModel::new(config.clone())?;
    let loss_history = model.fit(&dataset)?;
    let evaluation = model.evaluate(&dataset)?;

    let accuracy = evaluation.accuracy();
    let final_loss = loss_history.last().copied().unwrap_or(f64::INFINITY);
    let converged = final_loss < config.base().convergence_tol();
    info!(%gate, final_loss, accuracy, converged, "gate finished");

    Ok(TrainingResult {
        gate,
        variant: config.variant(),
        final_loss,
        accuracy,
        converged,
        params: model.params().clone(),
        probabilities: evaluation.probabilities,
        predictions: evaluation.predictions,
        targets: evaluation.targets,
        loss_history,
    })
}

/// The hyperparameter line of a summary, e.g. `blocks: 4 / learning rate: 0.1 / ...`.
fn hyperparameter_line(config: &CircuitConfig) -> String {
    let base = config.base();
    let mut line = format!(
        "blocks: {} / learning rate: {}",
        base.num_blocks(),
        base.learning_rate()
    );
    match config {
        CircuitConfig::Plain(_) => {}
        CircuitConfig::Angle(c) => {
            line.push_str(&format!(
                " / axis: {} / scale: {:.3} / bias: {:.3}",
                c.axis(),
                c.scale(),
                c.bias()
            ));
        }
        CircuitConfig::Entangled(c) => {
            let (control, target) = c.entangle_order();
            line.push_str(&format!(
                " / entangler: {} ({control}->{target}) / mirror: {}",
                c.entangler(),
                c.mirror()
            ));
        }
    }
    line
}

/// Summary lines for a training run, without styling.
///
/// The first line is the header; the last four are one per truth-table row.
pub fn summary_lines(result: &TrainingResult, config: &CircuitConfig) -> Vec<String> {
    let status = if result.is_success() {
        "success"
    } else {
        "limited"
    };
    let mut lines = vec![
        format!("[{} {}] training {status}", result.variant.label(), result.gate),
        format!(
            "final loss: {:.6} (tolerance {})",
            result.final_loss,
            config.base().convergence_tol()
        ),
        format!("accuracy: {:.1}%", result.accuracy * 100.0),
        hyperparameter_line(config),
        format!("parameters: {}", rounded(&result.params, 3)),
    ];
    let rows = truth_table_inputs(NUM_INPUTS);
    for (i, bits) in rows.iter().enumerate() {
        let (Some(prob), Some(pred), Some(target)) = (
            result.probabilities.get(i),
            result.predictions.get(i),
            result.targets.get(i),
        ) else {
            break;
        };
        lines.push(format!(
            "input {bits:?} -> P(1)={prob:.3} / prediction={pred} / target={target}"
        ));
    }
    lines
}

/// Print the summary of a training run to stdout.
pub fn log_result(result: &TrainingResult, config: &CircuitConfig) {
    let lines = summary_lines(result, config);
    let Some((header, body)) = lines.split_first() else {
        return;
    };
    print_section(header);
    let (stats, rows) = body.split_at(body.len().saturating_sub(result.targets.len()));
    for line in stats {
        match line.split_once(": ") {
            Some((label, value)) => print_result(label, value),
            None => println!("  {line}"),
        }
    }
    for (line, (pred, target)) in rows
        .iter()
        .zip(result.predictions.iter().zip(&result.targets))
    {
        if pred == target {
            println!("    {line}");
        } else {
            println!("    {}", style(line).red());
        }
    }
}

/// Default settings for a variant's experiment batch.
pub fn default_config(variant: Variant) -> ConfigResult<CircuitConfig> {
    Ok(match variant {
        Variant::Plain => PqcConfig::default().into(),
        Variant::Angle => AngleConfig::builder()
            .learning_rate(0.1)
            .max_steps(600)
            .num_blocks(3)
            .seed(11)
            .axis(EncodingAxis::Ry)
            .scale(PI)
            .bias(0.0)
            .build()?
            .into(),
        Variant::Entangled => EntangledConfig::builder()
            .learning_rate(0.1)
            .max_steps(800)
            .num_blocks(4)
            .seed(13)
            .entangler(Entangler::Cnot)
            .entangle_order(0, 1)
            .mirror(true)
            .build()?
            .into(),
    })
}

/// Train every gate in `gates`, calling `on_result` after each one.
///
/// The first failing gate aborts the batch.
pub fn run_experiments(
    config: &CircuitConfig,
    gates: &[LogicGate],
    mut on_result: impl FnMut(&TrainingResult) -> PqcResult<()>,
) -> PqcResult<Vec<TrainingResult>> {
    let mut results = Vec::with_capacity(gates.len());
    for &gate in gates {
        let result = train_gate(gate, config)?;
        on_result(&result)?;
        results.push(result);
    }
    info!(
        variant = %config.variant(),
        succeeded = results.iter().filter(|r| r.is_success()).count(),
        total = results.len(),
        "batch finished"
    );
    Ok(results)
}

fn run_and_report(config: &CircuitConfig) -> PqcResult<Vec<TrainingResult>> {
    run_experiments(config, &LogicGate::ALL, |result| {
        log_result(result, config);
        display_report(result, REPORT_INPUT)
    })
}

/// Train the plain variant on all six gates, printing each summary and diagram.
pub fn run_all_experiments(config: Option<PqcConfig>) -> PqcResult<Vec<TrainingResult>> {
    let config = match config {
        Some(c) => c.into(),
        None => default_config(Variant::Plain)?,
    };
    run_and_report(&config)
}

/// Train the angle-encoded variant on all six gates.
pub fn run_angle_experiments(config: Option<AngleConfig>) -> PqcResult<Vec<TrainingResult>> {
    let config = match config {
        Some(c) => c.into(),
        None => default_config(Variant::Angle)?,
    };
    run_and_report(&config)
}

/// Train the entangled variant on all six gates.
pub fn run_entangled_experiments(
    config: Option<EntangledConfig>,
) -> PqcResult<Vec<TrainingResult>> {
    let config = match config {
        Some(c) => c.into(),
        None => default_config(Variant::Entangled)?,
    };
    run_and_report(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(variant: Variant) -> CircuitConfig {
        default_config(variant)
            .unwrap()
            .with_overrides(&crate::config::ConfigOverrides {
                max_steps: Some(3),
                num_blocks: Some(1),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_default_configs() {
        let angle = default_config(Variant::Angle).unwrap();
        assert_eq!(angle.base().max_steps(), 600);
        assert_eq!(angle.base().num_blocks(), 3);
        assert_eq!(angle.base().seed(), 11);
        let ent = default_config(Variant::Entangled).unwrap();
        assert_eq!(ent.base().max_steps(), 800);
        assert_eq!(ent.base().learning_rate(), 0.1);
        assert_eq!(ent.base().seed(), 13);
        assert_eq!(
            default_config(Variant::Plain).unwrap().base(),
            &PqcConfig::default()
        );
    }

    #[test]
    fn test_train_gate_bookkeeping() {
        for variant in Variant::ALL {
            let config = quick(variant);
            let result = train_gate(LogicGate::And, &config).unwrap();
            assert_eq!(result.variant, variant);
            assert!(!result.loss_history.is_empty() && result.loss_history.len() <= 3);
            assert_eq!(result.final_loss, *result.loss_history.last().unwrap());
            assert_eq!(result.converged, result.final_loss < 1e-3);
            assert_eq!(result.targets, vec![0, 0, 0, 1]);
            let hits = result
                .predictions
                .iter()
                .zip(&result.targets)
                .filter(|(p, t)| p == t)
                .count();
            assert_eq!(result.accuracy, hits as f64 / 4.0);
        }
    }

    #[test]
    fn test_summary_lines() {
        let config = quick(Variant::Entangled);
        let result = train_gate(LogicGate::Xor, &config).unwrap();
        let lines = summary_lines(&result, &config);
        assert_eq!(lines.len(), 5 + 4);
        assert!(lines[0].starts_with("[Entangled XOR] training "));
        assert!(lines[1].starts_with("final loss: "));
        assert!(lines[1].ends_with("(tolerance 0.001)"));
        assert!(lines[3].contains("entangler: CNOT (0->1) / mirror: true"));
        assert!(lines[5].starts_with("input [0, 0] -> P(1)="));
        assert!(lines[8].ends_with(&format!("target={}", result.targets[3])));
    }

    #[test]
    fn test_hyperparameter_line_angle() {
        let config = default_config(Variant::Angle).unwrap();
        assert_eq!(
            hyperparameter_line(&config),
            "blocks: 3 / learning rate: 0.1 / axis: RY / scale: 3.142 / bias: 0.000"
        );
    }

    #[test]
    fn test_run_experiments_collects_in_order() {
        let config = quick(Variant::Plain);
        let mut seen = Vec::new();
        let results = run_experiments(&config, &[LogicGate::Or, LogicGate::Nor], |r| {
            seen.push(r.gate);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![LogicGate::Or, LogicGate::Nor]);
        assert_eq!(results.len(), 2);
    }
}
