//! Dataset generation pipeline
//!
//! Runs the partition, the chosen point source and the spatial join as one
//! deterministic call. The random stream is owned by the call, so
//! concurrent runs never interfere.

use crate::config::{DataGeneratorConfig, PointSource};
use crate::error::Result;
use crate::geometry::voronoi::partition;
use crate::geometry::GeoUnit;
use crate::points::assign::assign;
use crate::points::{process, sampling, PointEntity};
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Units and the points joined to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub units: Vec<GeoUnit>,
    pub points: Vec<PointEntity>,
}

/// Per-unit totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub unit_id: usize,
    pub area: f64,
    pub point_count: usize,
    pub sales_potential: f64,
    pub workload: f64,
}

impl Dataset {
    /// Totals for every unit, in `unit_id` order
    pub fn unit_summaries(&self) -> Vec<UnitSummary> {
        let mut summaries: Vec<UnitSummary> = self
            .units
            .iter()
            .map(|u| UnitSummary {
                unit_id: u.unit_id,
                area: u.area(),
                point_count: 0,
                sales_potential: 0.0,
                workload: 0.0,
            })
            .collect();
        summaries.sort_by_key(|s| s.unit_id);

        for point in &self.points {
            if let Ok(idx) = summaries.binary_search_by_key(&point.unit_id, |s| s.unit_id) {
                let summary = &mut summaries[idx];
                summary.point_count += 1;
                summary.sales_potential += point.sales_potential.unwrap_or(0.0);
                summary.workload += point.workload.unwrap_or(0.0);
            }
        }

        summaries
    }

    pub fn total_sales_potential(&self) -> f64 {
        self.points.iter().filter_map(|p| p.sales_potential).sum()
    }

    pub fn total_workload(&self) -> f64 {
        self.points.iter().filter_map(|p| p.workload).sum()
    }
}

/// Generate a complete dataset from its configuration
///
/// Seeds a private stream from `config.random_seed`.
pub fn generate_data(config: &DataGeneratorConfig) -> Result<Dataset> {
    let mut stream = rng::seeded(config.random_seed);
    generate_data_with_rng(config, &mut stream)
}

/// Generate a complete dataset using a caller-supplied stream
///
/// Sampled points ignore `rng`; they use the sampler's fixed seed.
pub fn generate_data_with_rng<R: Rng + ?Sized>(
    config: &DataGeneratorConfig,
    rng: &mut R,
) -> Result<Dataset> {
    info!("Generating Voronoi base units...");
    let units = partition(&config.voronoi_config, rng)?;

    let points = match config.point_source()? {
        PointSource::Sampling(sampling_config) => {
            info!("Generating points from sampling...");
            sampling::sample(sampling_config)?
        }
        PointSource::Distribution(distribution) => {
            info!(model = %distribution.model(), "Generating points from distribution model...");
            process::generate(distribution, &config.voronoi_config.bounding_box, rng)?
        }
    };

    info!("Assigning points to base units...");
    let points = assign(points, &units);

    info!(
        units = units.len(),
        points = points.len(),
        "Synthetic data generation complete"
    );

    Ok(Dataset { units, points })
}
