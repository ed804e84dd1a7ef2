//! Point process simulation
//!
//! Generates raw point locations from one of three stochastic models,
//! keeps the ones strictly inside the bounding box, and attaches synthetic
//! `sales_potential` and `workload` values.

use crate::config::{DistributionConfig, IntensityPeak};
use crate::constants::attributes::{
    DECIMALS, SALES_POTENTIAL_MAX, SALES_POTENTIAL_MIN, WORKLOAD_MAX, WORKLOAD_MIN,
};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::points::SourcePoint;
use crate::rng::round_to;
use geo::{coord, Coord, Point};
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use std::f64::consts::PI;
use tracing::debug;

/// Generate points from a distribution model
///
/// # Arguments
/// * `distribution` - Model and its parameters
/// * `bbox` - Region the points must fall strictly inside
/// * `rng` - Random stream for every draw
///
/// # Returns
/// The surviving points with synthetic attributes. An empty vector is a
/// valid result (e.g. a Poisson draw of zero, or every point filtered out).
pub fn generate<R: Rng + ?Sized>(
    distribution: &DistributionConfig,
    bbox: &BoundingBox,
    rng: &mut R,
) -> Result<Vec<SourcePoint>> {
    let raw = match distribution {
        DistributionConfig::HomogeneousPoisson { intensity } => {
            homogeneous_poisson(*intensity, bbox, rng)?
        }
        DistributionConfig::InhomogeneousPoisson { peaks } => gaussian_peaks(peaks, rng)?,
        DistributionConfig::NeymanScott {
            parent_intensity,
            offspring_per_parent,
            offspring_radius,
        } => neyman_scott(
            *parent_intensity,
            *offspring_per_parent,
            *offspring_radius,
            bbox,
            rng,
        )?,
    };

    let drawn = raw.len();
    let kept: Vec<Coord<f64>> = raw
        .into_iter()
        .filter(|c| bbox.contains_strict(*c))
        .collect();

    debug!(
        model = %distribution.model(),
        drawn,
        kept = kept.len(),
        "Filtered simulated points to bounding box"
    );

    Ok(attach_attributes(kept, rng))
}

/// Homogeneous Poisson process: Poisson count, uniform locations
fn homogeneous_poisson<R: Rng + ?Sized>(
    intensity: f64,
    bbox: &BoundingBox,
    rng: &mut R,
) -> Result<Vec<Coord<f64>>> {
    let count = poisson_count(intensity * bbox.area(), "intensity", rng)?;
    Ok((0..count).map(|_| uniform_in_box(bbox, rng)).collect())
}

/// Gaussian blobs: `weight` points per peak, normal on each axis
///
/// The weight is used directly as a point count rather than as the height
/// of an intensity surface.
fn gaussian_peaks<R: Rng + ?Sized>(
    peaks: &[IntensityPeak],
    rng: &mut R,
) -> Result<Vec<Coord<f64>>> {
    let mut points = Vec::new();

    for peak in peaks {
        if !peak.weight.is_finite() || peak.weight < 0.0 {
            return Err(Error::Validation(format!(
                "Peak weight must be a non-negative number, got {}",
                peak.weight
            )));
        }
        let x_dist = normal(peak.center_x, peak.spread)?;
        let y_dist = normal(peak.center_y, peak.spread)?;

        let count = peak.weight.trunc() as usize;
        points.reserve(count);
        for _ in 0..count {
            points.push(coord! { x: x_dist.sample(rng), y: y_dist.sample(rng) });
        }
    }

    Ok(points)
}

/// Neyman-Scott cluster process
///
/// Parents are uniform in the box; each parent emits `offspring_per_parent`
/// children at a uniform angle and a uniform radius in `[0, radius]`.
/// Only the offspring are returned.
fn neyman_scott<R: Rng + ?Sized>(
    parent_intensity: f64,
    offspring_per_parent: usize,
    offspring_radius: f64,
    bbox: &BoundingBox,
    rng: &mut R,
) -> Result<Vec<Coord<f64>>> {
    if !offspring_radius.is_finite() || offspring_radius < 0.0 {
        return Err(Error::Validation(format!(
            "offspring_radius must be a non-negative number, got {}",
            offspring_radius
        )));
    }

    let num_parents = poisson_count(parent_intensity * bbox.area(), "parent_intensity", rng)?;
    let parents: Vec<Coord<f64>> = (0..num_parents).map(|_| uniform_in_box(bbox, rng)).collect();

    let mut offspring = Vec::with_capacity(num_parents * offspring_per_parent);
    for parent in &parents {
        for _ in 0..offspring_per_parent {
            let theta = rng.gen_range(0.0..2.0 * PI);
            let r = rng.gen_range(0.0..=offspring_radius);
            offspring.push(coord! {
                x: parent.x + r * theta.cos(),
                y: parent.y + r * theta.sin(),
            });
        }
    }

    debug!(
        parents = num_parents,
        offspring = offspring.len(),
        "Simulated Neyman-Scott clusters"
    );

    Ok(offspring)
}

fn attach_attributes<R: Rng + ?Sized>(points: Vec<Coord<f64>>, rng: &mut R) -> Vec<SourcePoint> {
    points
        .into_iter()
        .map(|c| {
            let sales = round_to(
                rng.gen_range(SALES_POTENTIAL_MIN..=SALES_POTENTIAL_MAX),
                DECIMALS,
            );
            let workload = round_to(rng.gen_range(WORKLOAD_MIN..=WORKLOAD_MAX), DECIMALS);
            SourcePoint::with_attributes(Point::from(c), sales, workload)
        })
        .collect()
}

/// Draw a Poisson count with mean `lambda`
///
/// A mean of zero yields zero points.
fn poisson_count<R: Rng + ?Sized>(lambda: f64, name: &str, rng: &mut R) -> Result<usize> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(Error::Validation(format!(
            "{} must give a non-negative expected count, got {}",
            name, lambda
        )));
    }
    if lambda == 0.0 {
        return Ok(0);
    }
    let poisson = Poisson::new(lambda)
        .map_err(|e| Error::Validation(format!("Invalid Poisson mean {}: {}", lambda, e)))?;
    let count: f64 = poisson.sample(rng);
    Ok(count as usize)
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    if !mean.is_finite() {
        return Err(Error::Validation(format!(
            "Peak centre must be finite, got {}",
            mean
        )));
    }
    Normal::new(mean, std_dev).map_err(|e| {
        Error::Validation(format!("Invalid peak spread {}: {}", std_dev, e))
    })
}

fn uniform_in_box<R: Rng + ?Sized>(bbox: &BoundingBox, rng: &mut R) -> Coord<f64> {
    coord! {
        x: rng.gen_range(bbox.min_x()..bbox.max_x()),
        y: rng.gen_range(bbox.min_y()..bbox.max_y()),
    }
}
