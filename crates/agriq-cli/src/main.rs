//! agriq command-line interface.
//!
//! Runs the fertilizer, classifier and crop pipelines on a local simulator.
//! Settings come from `~/.agriq/config.yaml` (or `--config`), overridden by
//! flags.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::classify::ClassifyArgs;
use commands::common::{GlobalOptions, OutputFormat};
use commands::crop::CropArgs;
use commands::fertilizer::FertilizerArgs;
use commands::{all, backends, classify, config, crop, fertilizer, version};

/// agriq - quantum-classical example pipelines for agriculture
#[derive(Parser)]
#[command(name = "agriq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML config file (defaults to ~/.agriq/config.yaml when present)
    #[arg(short, long, global = true, env = "AGRIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for the simulator and synthetic data
    #[arg(long, global = true, env = "AGRIQ_SEED")]
    seed: Option<u64>,

    /// Backend to run on
    #[arg(short, long, global = true)]
    backend: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend fertilizer from soil nitrogen, phosphorus and potassium
    Fertilizer {
        /// Nitrogen level (rotation angle)
        #[arg(long, allow_negative_numbers = true)]
        nitrogen: Option<f64>,

        /// Phosphorus level (rotation angle)
        #[arg(long, allow_negative_numbers = true)]
        phosphorus: Option<f64>,

        /// Potassium level (rotation angle)
        #[arg(long, allow_negative_numbers = true)]
        potassium: Option<f64>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Print the outcome distribution
        #[arg(long)]
        histogram: bool,
    },

    /// Train a classifier on circuit-derived labels and label a new value
    Classify {
        /// Number of synthetic training samples
        #[arg(long)]
        samples: Option<usize>,

        /// Training epochs
        #[arg(long)]
        epochs: Option<usize>,

        /// Value to classify after training
        #[arg(long, allow_negative_numbers = true)]
        new_value: Option<f64>,

        /// Shots per circuit
        #[arg(short, long)]
        shots: Option<u32>,

        /// Training batch size
        #[arg(long)]
        batch_size: Option<usize>,

        /// Adam learning rate
        #[arg(long)]
        learning_rate: Option<f64>,

        /// Print the per-epoch loss
        #[arg(long)]
        history: bool,
    },

    /// Classify a crop from one scalar feature
    Crop {
        /// Feature value (rotation angle)
        #[arg(long, allow_negative_numbers = true)]
        value: Option<f64>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Print the outcome distribution
        #[arg(long)]
        histogram: bool,
    },

    /// Run all three pipelines in sequence
    All,

    /// Print the effective configuration as YAML
    Config,

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = GlobalOptions {
        config: cli.config,
        seed: cli.seed,
        backend: cli.backend,
        format: cli.format,
    };

    let result = match cli.command {
        Commands::Fertilizer {
            nitrogen,
            phosphorus,
            potassium,
            shots,
            histogram,
        } => {
            let args = FertilizerArgs {
                nitrogen,
                phosphorus,
                potassium,
                shots,
                histogram,
            };
            fertilizer::execute(&options, &args).await
        }

        Commands::Classify {
            samples,
            epochs,
            new_value,
            shots,
            batch_size,
            learning_rate,
            history,
        } => {
            let args = ClassifyArgs {
                samples,
                epochs,
                new_value,
                shots,
                batch_size,
                learning_rate,
                history,
            };
            classify::execute(&options, &args).await
        }

        Commands::Crop {
            value,
            shots,
            histogram,
        } => {
            let args = CropArgs {
                value,
                shots,
                histogram,
            };
            crop::execute(&options, &args).await
        }

        Commands::All => all::execute(&options).await,

        Commands::Config => config::execute(&options),

        Commands::Backends => backends::execute().await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
