//! Ripley's K-function with a CSR simulation envelope
//!
//! The study region is the convex hull of the input points. The observed
//! curve is compared against `permutation_count` simulations of complete
//! spatial randomness in the same hull, and the pattern is classified from
//! where the observed curve falls relative to the 95% envelope.

use crate::config::defaults::{DEFAULT_PERMUTATIONS, DEFAULT_STEPS};
use crate::constants::geometry::AREA_TOLERANCE;
use crate::constants::kfunction::{
    LOWER_PERCENTILE, MAX_RADIUS_FRACTION, MAX_REJECTION_ATTEMPTS, MIN_EXPECTED_PAIRS,
    UPPER_PERCENTILE,
};
use crate::error::{Error, Result};
use crate::rng;
use crate::stats::edge::isotropic_weight;
use geo::{
    Area, BoundingRect, ConvexHull, EuclideanDistance, Geometry, Intersects, MultiPoint, Point,
    Polygon, Rect,
};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, info, warn};

/// Overall classification of a point pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointPattern {
    /// Observed K above the upper envelope at every compared radius
    Clustered,
    /// Observed K below the lower envelope at every compared radius
    Dispersed,
    /// Any mixed or in-envelope result
    Random,
    #[serde(rename = "Unknown (simulations not available)")]
    Unknown,
}

impl PointPattern {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clustered => "Clustered",
            Self::Dispersed => "Dispersed",
            Self::Random => "Random",
            Self::Unknown => "Unknown (simulations not available)",
        }
    }
}

impl fmt::Display for PointPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Analysis options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KOptions {
    /// Number of evenly spaced radii, including 0
    pub step_count: usize,

    /// Number of CSR simulations; 0 disables the envelope
    pub permutation_count: usize,

    /// Caller's study area. Accepted but not used; the convex hull area is
    /// always used instead and reported as `hull_area`.
    pub area: Option<f64>,
}

impl Default for KOptions {
    fn default() -> Self {
        Self {
            step_count: DEFAULT_STEPS,
            permutation_count: DEFAULT_PERMUTATIONS,
            area: None,
        }
    }
}

/// Result of one K-function analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KFunctionResult {
    /// Ascending radii from 0
    pub radii: Vec<f64>,

    /// Observed K per radius
    pub observed: Vec<f64>,

    /// Mean simulated K per radius, or `pi * r^2` without simulations
    pub expected: Vec<f64>,

    /// `(lower, upper)` envelope per radius; empty without simulations
    pub envelope: Vec<(f64, f64)>,

    pub pattern: PointPattern,

    /// Area of the convex hull used as the study region
    pub hull_area: f64,

    /// Number of simulations behind the envelope
    pub simulations: usize,
}

/// Analyze a collection of geometries that must all be points
///
/// # Errors
/// `Validation` if the collection is empty or holds a non-point geometry.
pub fn analyze<R: Rng + ?Sized>(
    geometries: &[Geometry<f64>],
    options: &KOptions,
    rng: &mut R,
) -> Result<KFunctionResult> {
    if geometries.is_empty() {
        return Err(Error::Validation(
            "Input must be a non-empty point collection".to_string(),
        ));
    }

    let points = geometries
        .iter()
        .enumerate()
        .map(|(i, g)| match g {
            Geometry::Point(p) => Ok(*p),
            other => Err(Error::Validation(format!(
                "All geometries must be Points; item {} is a {}",
                i,
                geometry_kind(other)
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    analyze_points(&points, options, rng)
}

/// Analyze a point pattern
///
/// # Errors
/// `Validation` if `points` is empty or `step_count < 2`.
pub fn analyze_points<R: Rng + ?Sized>(
    points: &[Point<f64>],
    options: &KOptions,
    rng: &mut R,
) -> Result<KFunctionResult> {
    if points.is_empty() {
        return Err(Error::Validation(
            "Input must be a non-empty point collection".to_string(),
        ));
    }
    if options.step_count < 2 {
        return Err(Error::Validation(format!(
            "step_count must be at least 2, got {}",
            options.step_count
        )));
    }
    if let Some(area) = options.area {
        warn!(area, "Supplied area is ignored; using the convex hull area");
    }

    let hull = MultiPoint::from(points.to_vec()).convex_hull();
    let hull_area = hull.unsigned_area();
    // Collinear or coincident points span no area relative to their extent
    let degenerate = hull
        .bounding_rect()
        .map_or(true, |r| hull_area <= AREA_TOLERANCE * r.width().max(r.height()).powi(2));
    let radii = linspace(MAX_RADIUS_FRACTION * hull_area.sqrt(), options.step_count);

    info!(
        points = points.len(),
        hull_area,
        steps = options.step_count,
        permutations = options.permutation_count,
        "Running K-function analysis"
    );

    let observed = if degenerate {
        vec![0.0; radii.len()]
    } else {
        k_curve(points, &hull, hull_area, &radii)
    };

    let simulations = if options.permutation_count > 0 && !degenerate {
        simulate(points.len(), &hull, hull_area, &radii, options.permutation_count, rng)
    } else {
        None
    };

    let Some(simulations) = simulations else {
        warn!("Simulations not available; falling back to pi * r^2");
        return Ok(KFunctionResult {
            expected: radii.iter().map(|r| PI * r * r).collect(),
            radii,
            observed,
            envelope: Vec::new(),
            pattern: PointPattern::Unknown,
            hull_area,
            simulations: 0,
        });
    };

    let mut expected = Vec::with_capacity(radii.len());
    let mut envelope = Vec::with_capacity(radii.len());
    for step in 0..radii.len() {
        let mut column: Vec<f64> = simulations.iter().map(|curve| curve[step]).collect();
        column.sort_by(f64::total_cmp);
        expected.push(column.iter().sum::<f64>() / column.len() as f64);
        envelope.push((
            percentile(&column, LOWER_PERCENTILE),
            percentile(&column, UPPER_PERCENTILE),
        ));
    }

    let pairs = (points.len() * (points.len() - 1)) as f64;
    let compared: Vec<bool> = expected
        .iter()
        .map(|k| k * pairs / hull_area >= MIN_EXPECTED_PAIRS)
        .collect();
    debug!(
        compared = compared.iter().filter(|c| **c).count(),
        "Radii with enough expected pairs to classify"
    );

    let pattern = classify(&observed, &envelope, &compared);
    debug!(%pattern, "Classified point pattern");

    Ok(KFunctionResult {
        radii,
        observed,
        expected,
        envelope,
        pattern,
        hull_area,
        simulations: simulations.len(),
    })
}

/// Classify the observed curve against the envelope
///
/// Only radii flagged in `compared` take part. At small radii CSR expects
/// so few pairs that the envelope is a handful of discrete counts (all 0 at
/// r = 0), and no pattern can lie strictly outside it. With nothing to
/// compare the pattern is Random.
pub fn classify(observed: &[f64], envelope: &[(f64, f64)], compared: &[bool]) -> PointPattern {
    if envelope.is_empty() {
        return PointPattern::Unknown;
    }

    let mut compared = observed
        .iter()
        .zip(envelope)
        .zip(compared)
        .filter(|(_, keep)| **keep)
        .map(|(pair, _)| pair)
        .peekable();
    if compared.peek().is_none() {
        return PointPattern::Random;
    }

    let (mut above, mut below) = (true, true);
    for (k, (lower, upper)) in compared {
        above &= k > upper;
        below &= k < lower;
    }

    match (above, below) {
        (true, _) => PointPattern::Clustered,
        (_, true) => PointPattern::Dispersed,
        _ => PointPattern::Random,
    }
}

/// Edge-corrected K estimate at each radius
///
/// Only pairs within the largest radius are kept and weighted.
fn k_curve(points: &[Point<f64>], hull: &Polygon<f64>, hull_area: f64, radii: &[f64]) -> Vec<f64> {
    let n = points.len();
    let r_max = radii.last().copied().unwrap_or(0.0);
    if n < 2 {
        return vec![0.0; radii.len()];
    }

    let mut pairs = Vec::new();
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = a.euclidean_distance(b);
            if d <= r_max {
                pairs.push((d, isotropic_weight(a.0, d, hull)));
            }
        }
    }
    pairs.sort_by(|x, y| x.0.total_cmp(&y.0));

    let scale = hull_area / (n * (n - 1)) as f64;
    let mut curve = Vec::with_capacity(radii.len());
    let mut next = 0;
    let mut total = 0.0;
    for &r in radii {
        while next < pairs.len() && pairs[next].0 <= r {
            total += pairs[next].1;
            next += 1;
        }
        curve.push(total * scale);
    }
    curve
}

/// K curves of `count` CSR patterns in the hull
///
/// Each simulation gets its own child stream, so the result does not depend
/// on how rayon schedules them. `None` if any simulation cannot place its
/// points.
fn simulate<R: Rng + ?Sized>(
    n: usize,
    hull: &Polygon<f64>,
    hull_area: f64,
    radii: &[f64],
    count: usize,
    rng: &mut R,
) -> Option<Vec<Vec<f64>>> {
    let bounds = hull.bounding_rect()?;
    let seeds = rng::child_seeds(rng, count);

    seeds
        .into_par_iter()
        .map(|seed| {
            let mut stream = rng::seeded(seed);
            let pattern = csr_pattern(n, hull, &bounds, &mut stream)?;
            Some(k_curve(&pattern, hull, hull_area, radii))
        })
        .collect()
}

/// Uniform points in the hull by rejection from its bounding rectangle
fn csr_pattern<R: Rng + ?Sized>(
    n: usize,
    hull: &Polygon<f64>,
    bounds: &Rect<f64>,
    rng: &mut R,
) -> Option<Vec<Point<f64>>> {
    let (min, max) = (bounds.min(), bounds.max());
    (0..n)
        .map(|_| {
            (0..MAX_REJECTION_ATTEMPTS).find_map(|_| {
                let p = Point::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
                hull.intersects(&p).then_some(p)
            })
        })
        .collect()
}

fn linspace(max: f64, steps: usize) -> Vec<f64> {
    let last = (steps - 1) as f64;
    (0..steps).map(|i| max * i as f64 / last).collect()
}

/// Percentile of sorted values with linear interpolation
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let pos = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
