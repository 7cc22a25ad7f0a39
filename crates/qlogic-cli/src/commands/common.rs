//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use qlogic_pqc::{CircuitConfig, ConfigOverrides, LogicGate, NUM_INPUTS, Variant, default_config};

/// Command-line replacements for the shared training settings.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Seed for parameter initialization and shot sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum number of optimization steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Adam learning rate
    #[arg(long)]
    pub lr: Option<f64>,

    /// Number of ansatz blocks
    #[arg(long)]
    pub blocks: Option<usize>,

    /// Estimate expectation values from this many shots instead of exactly
    #[arg(long)]
    pub shots: Option<u32>,

    /// Convergence tolerance on the loss
    #[arg(long)]
    pub tol: Option<f64>,
}

impl From<&OverrideArgs> for ConfigOverrides {
    fn from(args: &OverrideArgs) -> Self {
        ConfigOverrides {
            learning_rate: args.lr,
            max_steps: args.steps,
            seed: args.seed,
            shots: args.shots,
            convergence_tol: args.tol,
            num_blocks: args.blocks,
        }
    }
}

/// Parse a gate name.
pub fn parse_gate(name: &str) -> Result<LogicGate> {
    Ok(name.parse::<LogicGate>()?)
}

/// Build the effective config: the file if given, else the variant's
/// defaults, then the command-line overrides.
pub fn resolve_config(
    variant: Option<&str>,
    config_path: Option<&str>,
    overrides: &OverrideArgs,
) -> Result<CircuitConfig> {
    let variant = variant.map(str::parse::<Variant>).transpose()?;

    let base = match config_path {
        Some(path) => {
            if !Path::new(path).exists() {
                anyhow::bail!("File not found: {path}");
            }
            let config = CircuitConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {path}"))?;
            if let Some(v) = variant.filter(|&v| v != config.variant()) {
                anyhow::bail!(
                    "Config file '{path}' is for the {} variant, not {v}",
                    config.variant()
                );
            }
            config
        }
        None => default_config(variant.unwrap_or(Variant::Plain))?,
    };

    let config = base
        .with_overrides(&overrides.into())
        .context("Invalid command-line override")?;
    debug!(variant = %config.variant(), ?config, "resolved configuration");
    Ok(config)
}

/// Parse input bits such as `10` or `1,0`.
pub fn parse_input(input: &str) -> Result<[u8; NUM_INPUTS]> {
    let bits: Vec<u8> = input
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '(' | ')'))
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(anyhow::anyhow!("Invalid input bit '{other}' in '{input}'")),
        })
        .collect::<Result<_>>()?;
    bits.try_into().map_err(|bits: Vec<u8>| {
        anyhow::anyhow!(
            "Expected {NUM_INPUTS} input bits, got {} in '{input}'",
            bits.len()
        )
    })
}
