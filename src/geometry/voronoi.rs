//! Voronoi partitioning of a bounding box
//!
//! Sites are drawn uniformly in the box, the box corners are added as
//! auxiliary sites, and the Voronoi diagram is derived from the Delaunay
//! triangulation: each cell's vertices are the circumcentres of the
//! triangles around its site. Cells touching the outer face are unbounded
//! and rejected; every kept cell is clipped to the box.

use crate::config::VoronoiConfig;
use crate::constants::geometry::{AREA_TOLERANCE, COORD_TOLERANCE, SENTINEL_FACTOR};
use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, GeoUnit};
use geo::{coord, Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use rand::Rng;
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::HashSet;
use tracing::debug;

/// Partition the configured bounding box into Voronoi units
///
/// # Arguments
/// * `config` - Number of sites and the box to partition
/// * `rng` - Random stream the sites are drawn from
///
/// # Returns
/// Units with `unit_id` 0..k-1 in site insertion order (random sites first,
/// then the four corners). Identical streams give identical partitions.
///
/// # Algorithm
/// The four box corners are real sites. Four sentinel sites far outside the
/// box keep the corner cells bounded; only the sentinel cells reach the
/// outer face, so the kept units cover the whole box. With `num_units = 0`
/// the result is the four corner cells.
pub fn partition<R: Rng + ?Sized>(config: &VoronoiConfig, rng: &mut R) -> Result<Vec<GeoUnit>> {
    let bbox = &config.bounding_box;

    let mut sites: Vec<Coord<f64>> = (0..config.num_units)
        .map(|_| {
            coord! {
                x: rng.gen_range(bbox.min_x()..bbox.max_x()),
                y: rng.gen_range(bbox.min_y()..bbox.max_y()),
            }
        })
        .collect();
    sites.extend(bbox.corners());

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let mut handles = Vec::with_capacity(sites.len());
    for site in sites.iter().chain(sentinel_sites(bbox).iter()) {
        let handle = triangulation
            .insert(Point2::new(site.x, site.y))
            .map_err(|e| {
                Error::Validation(format!(
                    "Cannot triangulate site ({}, {}): {:?}",
                    site.x, site.y, e
                ))
            })?;
        handles.push(handle);
    }
    // Sentinels are never emitted as units
    handles.truncate(sites.len());

    let clip = bbox.to_polygon();
    let tolerance = Tolerance {
        area: AREA_TOLERANCE * bbox.area(),
        coord: COORD_TOLERANCE * bbox.extent(),
    };
    let mut seen = HashSet::new();
    let mut units = Vec::new();

    for handle in handles {
        // Coincident sites share one vertex and one cell
        if !seen.insert(handle) {
            continue;
        }
        let Some(cell) = voronoi_cell(&triangulation, handle, &tolerance) else {
            continue;
        };
        let clipped = clip_to_box(&cell, &clip, tolerance.area);
        if clipped.unsigned_area() <= tolerance.area {
            continue;
        }
        units.push(GeoUnit::new(units.len(), clipped));
    }

    debug!(
        sites = sites.len(),
        units = units.len(),
        "Partitioned bounding box into Voronoi units"
    );

    Ok(units)
}

/// Tolerances scaled to the box being partitioned
struct Tolerance {
    area: f64,
    coord: f64,
}

/// Four sites placed well outside the box, one beyond each side
fn sentinel_sites(bbox: &BoundingBox) -> [Coord<f64>; 4] {
    let c = bbox.center();
    let dx = SENTINEL_FACTOR * bbox.width();
    let dy = SENTINEL_FACTOR * bbox.height();
    [
        coord! { x: c.x - dx, y: c.y },
        coord! { x: c.x + dx, y: c.y },
        coord! { x: c.x, y: c.y - dy },
        coord! { x: c.x, y: c.y + dy },
    ]
}

/// Build the Voronoi cell of one site
///
/// Returns None if the cell references the outer face (a vertex at
/// infinity), has fewer than three distinct vertices, or has no area.
fn voronoi_cell(
    triangulation: &DelaunayTriangulation<Point2<f64>>,
    handle: FixedVertexHandle,
    tolerance: &Tolerance,
) -> Option<Polygon<f64>> {
    let vertex = triangulation.vertex(handle);
    let site = vertex.position();

    let mut corners = Vec::new();
    for edge in vertex.out_edges() {
        let face = edge.face().as_inner()?;
        let [a, b, c] = face.positions();
        corners.push(circumcenter(a, b, c)?);
    }

    corners.sort_by(|p, q| {
        let angle_p = (p.y - site.y).atan2(p.x - site.x);
        let angle_q = (q.y - site.y).atan2(q.x - site.x);
        angle_p.total_cmp(&angle_q)
    });
    // Cocircular sites produce repeated circumcentres
    corners.dedup_by(|p, q| near(*p, *q, tolerance.coord));
    if corners.len() > 1 && near(corners[0], corners[corners.len() - 1], tolerance.coord) {
        corners.pop();
    }
    if corners.len() < 3 {
        return None;
    }

    let polygon = Polygon::new(LineString::from(corners), vec![]);
    if polygon.unsigned_area() <= tolerance.area {
        return None;
    }
    Some(polygon)
}

fn clip_to_box(cell: &Polygon<f64>, clip: &Polygon<f64>, min_area: f64) -> MultiPolygon<f64> {
    let clipped = cell.intersection(clip);
    MultiPolygon::new(
        clipped
            .into_iter()
            .filter(|p| p.unsigned_area() > min_area)
            .collect(),
    )
}

fn near(p: Coord<f64>, q: Coord<f64>, tolerance: f64) -> bool {
    (p.x - q.x).abs() <= tolerance && (p.y - q.y).abs() <= tolerance
}

/// Circumcentre, computed relative to `a` to keep precision far from the origin
fn circumcenter(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<Coord<f64>> {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = 2.0 * (bx * cy - by * cx);
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    // Collinear: twice the triangle area vanishes against the side lengths
    if d.abs() <= f64::EPSILON * (b2 + c2) {
        return None;
    }
    Some(coord! {
        x: a.x + (cy * b2 - by * c2) / d,
        y: a.y + (bx * c2 - cx * b2) / d,
    })
}
