//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default bounding box `(min_x, min_y, max_x, max_y)`
pub const DEFAULT_BOUNDING_BOX: [f64; 4] = [0.0, 0.0, 100.0, 100.0];

/// Default number of Voronoi sites in a starter config
pub const DEFAULT_NUM_UNITS: usize = 10;

/// Default random seed for a generation run
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Default intensity of the starter homogeneous Poisson model
pub const DEFAULT_INTENSITY: f64 = 0.05;

/// Default sampling method
pub const DEFAULT_SAMPLING_METHOD: &str = "proportional";

/// Default fraction of source rows kept by sampling
pub const DEFAULT_SAMPLING_FRACTION: f64 = 0.5;

/// Default number of K-function radii
pub const DEFAULT_STEPS: usize = 100;

/// Default number of CSR simulations for the envelope
pub const DEFAULT_PERMUTATIONS: usize = 99;

/// Default output format
pub const DEFAULT_FORMAT: &str = "json";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "generator.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "spatial-synth";
