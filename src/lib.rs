//! spatial-synth: Synthetic Spatial Datasets and Point Pattern Analysis
//!
//! A library and CLI tool for generating synthetic spatial datasets (a
//! Voronoi partition of a region plus a weighted point population) and for
//! testing point patterns against complete spatial randomness.
//!
//! ## Features
//!
//! - Voronoi partitioning of a bounding box into units
//! - Homogeneous Poisson, Gaussian-peak and Neyman-Scott point processes
//! - Reproducible subsampling of a CSV source
//! - Strict-containment spatial join of points to units
//! - Ripley's K-function with a Monte Carlo CSR envelope
//!
//! ## Quick Start
//!
//! ```rust
//! use spatial_synth::config::{DataGeneratorConfig, DistributionConfig, VoronoiConfig};
//! use spatial_synth::geometry::BoundingBox;
//! use spatial_synth::pipeline::generate_data;
//! use spatial_synth::stats::{analyze_points, KOptions};
//!
//! let region = BoundingBox::new(0.0, 0.0, 100.0, 100.0).unwrap();
//! let config = DataGeneratorConfig::new(VoronoiConfig::new(10, region), 42)
//!     .with_distribution(DistributionConfig::NeymanScott {
//!         parent_intensity: 0.002,
//!         offspring_per_parent: 8,
//!         offspring_radius: 3.0,
//!     });
//!
//! let dataset = generate_data(&config).unwrap();
//! println!("{} units, {} points", dataset.units.len(), dataset.points.len());
//!
//! // Test the generated points for clustering
//! let points: Vec<_> = dataset.points.iter().map(|p| p.location).collect();
//! let options = KOptions { step_count: 20, permutation_count: 19, area: None };
//! let mut rng = spatial_synth::rng::seeded(7);
//! if let Ok(result) = analyze_points(&points, &options, &mut rng) {
//!     println!("Pattern: {}", result.pattern);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geometry;
pub mod pipeline;
pub mod points;
pub mod rng;
pub mod source;
pub mod stats;

// Re-export commonly used types
pub use config::{DataGeneratorConfig, DistributionConfig, SamplingConfig, VoronoiConfig};
pub use error::{Error, Result};
pub use geometry::{BoundingBox, GeoUnit};
pub use pipeline::{generate_data, Dataset};
pub use points::PointEntity;
pub use stats::{KFunctionResult, PointPattern};
