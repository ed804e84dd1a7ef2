//! Isotropic edge correction
//!
//! A pair at distance `d` is weighted by the inverse of the fraction of the
//! circle of radius `d` around the first point that lies inside the study
//! region. Pairs near the region boundary would otherwise be undercounted.

use geo::{Coord, Intersects, Line, Point, Polygon};
use std::f64::consts::TAU;

/// Crossing angles closer than this are the same crossing
const ANGLE_EPSILON: f64 = 1e-12;

/// Fractions below this are treated as a degenerate circle and get weight 1
const MIN_FRACTION: f64 = 1e-6;

/// Fraction of the circle perimeter around `center` that lies in `region`
///
/// Returns 1.0 for a non-positive radius.
pub fn circle_fraction_inside(center: Coord<f64>, radius: f64, region: &Polygon<f64>) -> f64 {
    if radius <= 0.0 {
        return 1.0;
    }

    let mut angles: Vec<f64> = region
        .exterior()
        .lines()
        .flat_map(|line| crossing_angles(center, radius, line))
        .collect();

    if angles.is_empty() {
        let on_arc = on_circle(center, radius, 0.0);
        return if region.intersects(&on_arc) { 1.0 } else { 0.0 };
    }

    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|a, b| (*a - *b).abs() < ANGLE_EPSILON);

    let mut inside = 0.0;
    for (i, &start) in angles.iter().enumerate() {
        let end = angles.get(i + 1).copied().unwrap_or(angles[0] + TAU);
        let on_arc = on_circle(center, radius, (start + end) / 2.0);
        if region.intersects(&on_arc) {
            inside += end - start;
        }
    }

    (inside / TAU).clamp(0.0, 1.0)
}

/// Ripley's isotropic weight for a pair at `distance` from `center`
pub fn isotropic_weight(center: Coord<f64>, distance: f64, region: &Polygon<f64>) -> f64 {
    let fraction = circle_fraction_inside(center, distance, region);
    if fraction > MIN_FRACTION {
        1.0 / fraction
    } else {
        1.0
    }
}

fn on_circle(center: Coord<f64>, radius: f64, angle: f64) -> Point<f64> {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Angles (from `center`) where the circle crosses a segment
fn crossing_angles(center: Coord<f64>, radius: f64, line: Line<f64>) -> Vec<f64> {
    let d = line.delta();
    let f = line.start - center;

    let a = d.x * d.x + d.y * d.y;
    if a == 0.0 {
        return Vec::new();
    }
    let b = 2.0 * (f.x * d.x + f.y * d.y);
    let c = f.x * f.x + f.y * f.y - radius * radius;

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }

    let sq = disc.sqrt();
    [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)]
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .map(|t| {
            let x = line.start.x + t * d.x - center.x;
            let y = line.start.y + t * d.y - center.y;
            y.atan2(x)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{coord, polygon};

    fn square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]
    }

    #[test]
    fn test_circle_fully_inside() {
        let f = circle_fraction_inside(coord! { x: 5.0, y: 5.0 }, 2.0, &square());
        assert_eq!(f, 1.0);
    }

    #[test]
    fn test_circle_on_edge_is_half_inside() {
        let f = circle_fraction_inside(coord! { x: 5.0, y: 0.0 }, 2.0, &square());
        assert_relative_eq!(f, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_at_corner_is_quarter_inside() {
        let f = circle_fraction_inside(coord! { x: 0.0, y: 0.0 }, 3.0, &square());
        assert_relative_eq!(f, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_crossing_one_edge() {
        // Chord at distance 1 from the centre of a radius-2 circle cuts off
        // an arc of 2 * acos(1/2) = 2pi/3
        let f = circle_fraction_inside(coord! { x: 5.0, y: 1.0 }, 2.0, &square());
        assert_relative_eq!(f, 1.0 - 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_enclosing_region() {
        let f = circle_fraction_inside(coord! { x: 5.0, y: 5.0 }, 100.0, &square());
        assert_eq!(f, 0.0);
        // Degenerate fraction falls back to an unweighted pair
        assert_eq!(isotropic_weight(coord! { x: 5.0, y: 5.0 }, 100.0, &square()), 1.0);
    }

    #[test]
    fn test_isotropic_weight() {
        let w = isotropic_weight(coord! { x: 5.0, y: 0.0 }, 2.0, &square());
        assert_relative_eq!(w, 2.0, epsilon = 1e-9);
        assert_eq!(isotropic_weight(coord! { x: 5.0, y: 5.0 }, 0.0, &square()), 1.0);
    }
}
