//! Generate command handler
//!
//! Builds a synthetic dataset from a config file.

use crate::cli::{emit, list_formats};
use crate::config::defaults::DEFAULT_FORMAT;
use crate::config::DataGeneratorConfig;
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::pipeline::generate_data;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Generate command arguments
#[derive(Args)]
pub struct GenerateArgs {
    /// Config file (defaults to the user config location)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let path = match args.config {
        Some(path) => path,
        None => DataGeneratorConfig::default_path()?,
    };
    info!(path = %path.display(), "Loading generator config");
    let mut config = DataGeneratorConfig::load(&path)?;

    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }

    let format = args.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let dataset = generate_data(&config)?;
    let output = formatter.format_dataset(&dataset)?;

    emit(&output, args.output.as_ref())
}
