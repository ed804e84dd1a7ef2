//! spatial-synth CLI entry point
//!
//! Synthetic spatial dataset generator and point pattern analyzer

use spatial_synth::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
