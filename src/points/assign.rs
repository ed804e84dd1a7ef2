//! Spatial join of points to units
//!
//! Each point goes to the unit that strictly contains it. Points outside
//! every unit (or exactly on a shared edge) are dropped. When rounding
//! leaves a point inside more than one unit, the lowest `unit_id` wins.

use crate::geometry::GeoUnit;
use crate::points::{PointEntity, SourcePoint};
use geo::{BoundingRect, Point, Rect};
use tracing::debug;

/// Join points to the units that contain them
///
/// # Arguments
/// * `points` - Generated or sampled points, in output order
/// * `units` - Partition cells
///
/// # Returns
/// Joined points with `customer_id` 0..n-1 over the kept points, in input
/// order.
pub fn assign(points: Vec<SourcePoint>, units: &[GeoUnit]) -> Vec<PointEntity> {
    let bounds: Vec<Option<Rect<f64>>> = units.iter().map(|u| u.geometry.bounding_rect()).collect();
    let input = points.len();

    let joined: Vec<PointEntity> = points
        .into_iter()
        .filter_map(|p| containing_unit(&p.location, units, &bounds).map(|unit_id| (unit_id, p)))
        .enumerate()
        .map(|(customer_id, (unit_id, p))| PointEntity {
            customer_id,
            unit_id,
            location: p.location,
            sales_potential: p.sales_potential,
            workload: p.workload,
            columns: p.columns,
        })
        .collect();

    debug!(
        input,
        joined = joined.len(),
        dropped = input - joined.len(),
        "Assigned points to units"
    );

    joined
}

/// Lowest id among the units strictly containing `point`
fn containing_unit(point: &Point<f64>, units: &[GeoUnit], bounds: &[Option<Rect<f64>>]) -> Option<usize> {
    units
        .iter()
        .zip(bounds)
        .filter(|(_, rect)| rect.is_some_and(|r| rect_covers(&r, point)))
        .filter(|(unit, _)| unit.contains(point))
        .map(|(unit, _)| unit.unit_id)
        .min()
}

fn rect_covers(rect: &Rect<f64>, point: &Point<f64>) -> bool {
    point.x() >= rect.min().x
        && point.x() <= rect.max().x
        && point.y() >= rect.min().y
        && point.y() <= rect.max().y
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square_unit(unit_id: usize, x0: f64, y0: f64, size: f64) -> GeoUnit {
        GeoUnit::new(
            unit_id,
            MultiPolygon::new(vec![polygon![
                (x: x0, y: y0),
                (x: x0 + size, y: y0),
                (x: x0 + size, y: y0 + size),
                (x: x0, y: y0 + size),
            ]]),
        )
    }

    fn pt(x: f64, y: f64) -> SourcePoint {
        SourcePoint::with_attributes(Point::new(x, y), 1000.0, 1.0)
    }

    #[test]
    fn test_assign_by_containment() {
        let units = vec![square_unit(0, 0.0, 0.0, 5.0), square_unit(1, 5.0, 0.0, 5.0)];
        let joined = assign(vec![pt(1.0, 1.0), pt(7.0, 2.0), pt(4.0, 4.0)], &units);

        assert_eq!(joined.len(), 3);
        assert_eq!(
            joined.iter().map(|p| p.unit_id).collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
        assert_eq!(
            joined.iter().map(|p| p.customer_id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(joined[1].sales_potential, Some(1000.0));
    }

    #[test]
    fn test_unassigned_points_dropped() {
        let units = vec![square_unit(0, 0.0, 0.0, 5.0)];
        let joined = assign(vec![pt(20.0, 20.0), pt(2.0, 2.0)], &units);

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].customer_id, 0);
        assert_eq!(joined[0].x(), 2.0);
    }

    #[test]
    fn test_shared_edge_point_dropped() {
        let units = vec![square_unit(0, 0.0, 0.0, 5.0), square_unit(1, 5.0, 0.0, 5.0)];
        let joined = assign(vec![pt(5.0, 2.0)], &units);
        assert!(joined.is_empty());
    }

    #[test]
    fn test_overlap_resolved_to_lowest_id() {
        // Overlapping units listed in descending id order
        let units = vec![square_unit(7, 0.0, 0.0, 10.0), square_unit(3, 2.0, 2.0, 4.0)];
        let joined = assign(vec![pt(3.0, 3.0)], &units);

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].unit_id, 3);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(assign(vec![], &[square_unit(0, 0.0, 0.0, 1.0)]).is_empty());
        assert!(assign(vec![pt(0.5, 0.5)], &[]).is_empty());
    }
}
