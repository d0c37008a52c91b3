//! Tally CLI binary.
//!
//! Provides a command-line interface for combining ensemble predictions.

mod cmd;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Combine ensemble predictions into a consensus", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine prediction rows read as JSON
    Combine {
        /// JSON file holding an array of rows, each an array of prediction records ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Combination method (plurality, confidence weighted, probability weighted)
        #[arg(short, long)]
        method: Option<String>,

        /// Exponent spread between best and worst regression error weight
        #[arg(long)]
        top_range: Option<f64>,

        /// z-score for the combined classification confidence
        #[arg(long)]
        z: Option<f64>,

        /// TOML file with method, top_range and confidence_z
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Include the full candidate ranking for classification rows
        #[arg(long)]
        rank: bool,
    },

    /// List available combination methods
    Methods,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("tally=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Combine {
            input,
            method,
            top_range,
            z,
            config,
            rank,
        } => {
            let config = config::load(config.as_deref(), method.as_deref(), top_range, z)?;
            cmd::combine::combine_rows(&input, config, rank)?;
        }
        Commands::Methods => {
            cmd::methods::list_methods();
        }
    }

    Ok(())
}
