//! Point populations
//!
//! This module handles:
//! - Simulating points from stochastic point processes
//! - Subsampling points from an existing CSV source
//! - Joining points to the units that contain them

pub mod assign;
pub mod process;
pub mod sampling;

use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point before it is joined to a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePoint {
    pub location: Point<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_potential: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<f64>,

    /// Remaining columns of a sampled source row
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, String>,
}

impl SourcePoint {
    /// Create a bare point with no attributes
    pub fn new(location: Point<f64>) -> Self {
        Self {
            location,
            sales_potential: None,
            workload: None,
            columns: BTreeMap::new(),
        }
    }

    /// Create a generated point with synthetic business weight
    pub fn with_attributes(location: Point<f64>, sales_potential: f64, workload: f64) -> Self {
        Self {
            location,
            sales_potential: Some(sales_potential),
            workload: Some(workload),
            columns: BTreeMap::new(),
        }
    }
}

/// A point joined to the unit that contains it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEntity {
    /// Sequential id over the joined output, starting at 0
    pub customer_id: usize,

    /// Id of the containing unit
    pub unit_id: usize,

    pub location: Point<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_potential: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<f64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, String>,
}

impl PointEntity {
    pub fn x(&self) -> f64 {
        self.location.x()
    }

    pub fn y(&self) -> f64 {
        self.location.y()
    }
}
