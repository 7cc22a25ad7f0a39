//! qlogic Command-Line Interface
//!
//! Train two-qubit parameterized circuits to reproduce classical logic gates.
//!
//! ```text
//! qlogic gates
//! qlogic train --gate xor --variant entangled
//! qlogic run --variant angle --config angle.yaml
//! qlogic draw --gate nand --variant entangled --input 10
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::OverrideArgs;
use commands::{config, draw, gates, run, train};

/// qlogic - parameterized quantum circuits that learn logic gates
#[derive(Parser)]
#[command(name = "qlogic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Circuit variant and optional YAML config file.
#[derive(Args)]
struct ModelArgs {
    /// Circuit variant (plain, angle, entangled)
    #[arg(long)]
    variant: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the truth table of every supported gate
    Gates,

    /// Train a circuit for one gate
    Train {
        /// Gate to learn (AND, OR, NAND, NOR, XOR, XNOR)
        #[arg(short, long)]
        gate: String,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Train a variant on all six gates
    Run {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Draw the circuit of an untrained model for one input row
    Draw {
        /// Gate the model is built for
        #[arg(short, long)]
        gate: String,

        #[command(flatten)]
        model: ModelArgs,

        /// Input bits, e.g. 10
        #[arg(short, long, default_value = "11")]
        input: String,

        /// Fold width (0 disables folding)
        #[arg(long, default_value = "120")]
        fold: usize,
    },

    /// Print the effective configuration as YAML
    Config {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Train {
            gate,
            model,
            overrides,
        } => train::execute(
            &gate,
            model.variant.as_deref(),
            model.config.as_deref(),
            &overrides,
        ),

        Commands::Run { model, overrides } => run::execute(
            model.variant.as_deref(),
            model.config.as_deref(),
            &overrides,
        ),

        Commands::Draw {
            gate,
            model,
            input,
            fold,
        } => draw::execute(
            &gate,
            model.variant.as_deref(),
            model.config.as_deref(),
            &input,
            fold,
        ),

        Commands::Config { model, overrides } => config::execute(
            model.variant.as_deref(),
            model.config.as_deref(),
            &overrides,
        ),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
