//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod analyze;
pub mod config;
pub mod generate;

use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Synthetic spatial dataset generator and point pattern analyzer
#[derive(Parser)]
#[command(name = "spatial-synth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic dataset
    Generate(generate::GenerateArgs),

    /// Run Ripley's K-function on points from a CSV file
    Analyze(analyze::AnalyzeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for formatted output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Analyze(args) => analyze::run(args),
        Commands::Config(args) => config::run(args),
    }
}

/// Print to stdout or write to `path`
pub(crate) fn emit(output: &str, path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)?;
            eprintln!("Output written to {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

/// Print available output formats
pub(crate) fn list_formats() {
    println!("Available output formats:");
    for format in crate::format::available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
