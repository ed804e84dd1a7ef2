//! Analyze command handler
//!
//! Reads points from a CSV file and runs Ripley's K-function on them.

use crate::cli::emit;
use crate::config::defaults::{
    DEFAULT_FORMAT, DEFAULT_PERMUTATIONS, DEFAULT_RANDOM_SEED, DEFAULT_STEPS,
};
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::rng;
use crate::stats::{analyze_points, KOptions};
use clap::Args;
use geo::Point;
use std::path::{Path, PathBuf};
use tracing::info;

/// Analyze command arguments
#[derive(Args)]
pub struct AnalyzeArgs {
    /// CSV file of points
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Column holding x coordinates
    #[arg(long, default_value = "x")]
    pub x_column: String,

    /// Column holding y coordinates
    #[arg(long, default_value = "y")]
    pub y_column: String,

    /// Number of distance steps
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Number of CSR simulations for the envelope
    #[arg(long, short = 'p', default_value_t = DEFAULT_PERMUTATIONS)]
    pub permutations: usize,

    /// Seed for the simulations
    #[arg(long, short = 's', default_value_t = DEFAULT_RANDOM_SEED)]
    pub seed: u64,

    /// Study area (ignored; the convex hull area is used)
    #[arg(long)]
    pub area: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Run the analyze command
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let format = args.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let points = read_points(&args.input, &args.x_column, &args.y_column)?;
    info!(path = %args.input.display(), points = points.len(), "Loaded points");

    let options = KOptions {
        step_count: args.steps,
        permutation_count: args.permutations,
        area: args.area,
    };
    let result = analyze_points(&points, &options, &mut rng::seeded(args.seed))?;
    let output = formatter.format_analysis(&result)?;

    emit(&output, args.output.as_ref())
}

/// Read point coordinates from two CSV columns
fn read_points(path: &Path, x_column: &str, y_column: &str) -> Result<Vec<Point<f64>>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::Schema(format!("{} has no column '{}'", path.display(), name)))
    };
    let (x_idx, y_idx) = (find(x_column)?, find(y_column)?);

    let mut points = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let value = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| {
                Error::Schema(format!("Row {}: {} value '{}' is not a number", row, name, raw))
            })
        };
        points.push(Point::new(value(x_idx, x_column)?, value(y_idx, y_column)?));
    }

    Ok(points)
}
