//! Region geometry
//!
//! This module handles:
//! - The validated bounding box every generator works inside
//! - Geographic units (the polygonal partition of the box)
//! - Voronoi partitioning of the box into units

pub mod voronoi;

use crate::config::defaults::DEFAULT_BOUNDING_BOX;
use crate::error::{Error, Result};
use geo::{coord, Area, Contains, Coord, MultiPolygon, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(min_x, min_y, max_x, max_y)`
///
/// Always satisfies `min_x < max_x` and `min_y < max_y`. Serialized as a
/// four-element array so config files can write `bounding_box = [0, 0, 100, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting empty, inverted or non-finite extents
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return Err(Error::Validation(format!(
                "Bounding box ({}, {}, {}, {}) has non-finite bounds",
                min_x, min_y, max_x, max_y
            )));
        }
        if min_x >= max_x || min_y >= max_y {
            return Err(Error::Validation(format!(
                "Bounding box ({}, {}, {}, {}) must satisfy min_x < max_x and min_y < max_y",
                min_x, min_y, max_x, max_y
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Bounding box of a geo rectangle
    pub fn from_rect(rect: Rect<f64>) -> Result<Self> {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Length of the longer side
    pub fn extent(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn center(&self) -> Coord<f64> {
        coord! {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// The four corners, counter-clockwise from `(min_x, min_y)`
    pub fn corners(&self) -> [Coord<f64>; 4] {
        [
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
            coord! { x: self.min_x, y: self.max_y },
        ]
    }

    /// Strict interior test
    ///
    /// Points on the edge are outside. This is the same "within" convention
    /// the spatial join uses, so generation and assignment agree on edges.
    pub fn contains_strict(&self, c: Coord<f64>) -> bool {
        c.x > self.min_x && c.x < self.max_x && c.y > self.min_y && c.y < self.max_y
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        let [min_x, min_y, max_x, max_y] = DEFAULT_BOUNDING_BOX;
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = Error;

    fn try_from(b: [f64; 4]) -> Result<Self> {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_x, b.min_y, b.max_x, b.max_y]
    }
}

/// One cell of the partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoUnit {
    /// Sequential id in generation order, starting at 0
    pub unit_id: usize,
    /// Cell geometry, already clipped to the bounding box
    pub geometry: MultiPolygon<f64>,
}

impl GeoUnit {
    pub fn new(unit_id: usize, geometry: MultiPolygon<f64>) -> Self {
        Self { unit_id, geometry }
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    /// Strict "within" containment: boundary points are not contained
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.geometry.contains(point)
    }

    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_bounding_box_valid() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 5.0).unwrap();
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 5.0);
        assert_eq!(b.area(), 50.0);
        assert_eq!(b.center(), coord! { x: 5.0, y: 2.5 });
    }

    #[test]
    fn test_bounding_box_rejects_inverted() {
        assert!(matches!(
            BoundingBox::new(10.0, 0.0, 0.0, 10.0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 0.0, 10.0, 0.0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_bounding_box_rejects_nan() {
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_contains_strict_excludes_edges() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(b.contains_strict(coord! { x: 5.0, y: 5.0 }));
        assert!(!b.contains_strict(coord! { x: 0.0, y: 5.0 }));
        assert!(!b.contains_strict(coord! { x: 5.0, y: 10.0 }));
        assert!(!b.contains_strict(coord! { x: 11.0, y: 5.0 }));
    }

    #[test]
    fn test_bounding_box_serde_as_array() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");

        let parsed: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, b);

        let invalid: std::result::Result<BoundingBox, _> = serde_json::from_str("[5.0,0.0,1.0,1.0]");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_unit_contains_is_strict() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];
        let unit = GeoUnit::new(0, MultiPolygon::new(vec![square]));

        assert!(unit.contains(&Point::new(0.5, 0.5)));
        assert!(!unit.contains(&Point::new(1.0, 0.5)));
        assert!(!unit.contains(&Point::new(2.0, 0.5)));
        assert!((unit.area() - 1.0).abs() < 1e-12);
    }
}
