//! Centralized constants for the spatial-synth crate
//!
//! Constants shared by generation, sampling and analysis.

/// Synthetic business attributes attached to generated points
pub mod attributes {
    /// Lower bound of the `sales_potential` uniform draw
    pub const SALES_POTENTIAL_MIN: f64 = 1000.0;

    /// Upper bound of the `sales_potential` uniform draw
    pub const SALES_POTENTIAL_MAX: f64 = 10_000.0;

    /// Lower bound of the `workload` uniform draw
    pub const WORKLOAD_MIN: f64 = 1.0;

    /// Upper bound of the `workload` uniform draw
    pub const WORKLOAD_MAX: f64 = 10.0;

    /// Decimal places kept on both attributes
    pub const DECIMALS: i32 = 2;
}

/// Tabular source settings
pub mod sampling {
    /// Seed used for every sampling draw, independent of the run seed
    pub const SAMPLING_SEED: u64 = 42;

    /// Column holding the y coordinate
    pub const LATITUDE_COLUMN: &str = "latitude";

    /// Column holding the x coordinate
    pub const LONGITUDE_COLUMN: &str = "longitude";
}

/// Geometry tolerances
pub mod geometry {
    /// Areas at or below this fraction of the region's area are treated as empty
    pub const AREA_TOLERANCE: f64 = 1e-12;

    /// Coordinates closer than this fraction of the region's extent coincide
    pub const COORD_TOLERANCE: f64 = 1e-9;

    /// Distance of the sentinel sites from the box centre, in box extents
    pub const SENTINEL_FACTOR: f64 = 4.0;
}

/// K-function settings
pub mod kfunction {
    /// Lower percentile of the simulation envelope
    pub const LOWER_PERCENTILE: f64 = 2.5;

    /// Upper percentile of the simulation envelope
    pub const UPPER_PERCENTILE: f64 = 97.5;

    /// Maximum radius as a fraction of sqrt(hull area)
    pub const MAX_RADIUS_FRACTION: f64 = 0.25;

    /// Rejection-sampling attempts per point before a simulation gives up
    pub const MAX_REJECTION_ATTEMPTS: usize = 10_000;

    /// Radii where CSR expects fewer ordered point pairs than this are not
    /// used for classification
    pub const MIN_EXPECTED_PAIRS: f64 = 40.0;
}
