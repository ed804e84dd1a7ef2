//! Generation configuration
//!
//! Immutable records describing one generation run, plus TOML load/save.
//! Default file location: ~/.config/spatial-synth/generator.toml
//!
//! ```toml
//! random_seed = 42
//!
//! [voronoi]
//! num_units = 10
//! bounding_box = [0.0, 0.0, 100.0, 100.0]
//!
//! [distribution]
//! model = "neyman_scott"
//! parent_intensity = 0.002
//! offspring_per_parent = 8
//! offspring_radius = 3.0
//! ```

pub mod defaults;

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use defaults::*;
use geo::{BoundingRect, MultiPolygon};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parameters of the base Voronoi partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoronoiConfig {
    /// Number of random sites (the box corners are added on top)
    pub num_units: usize,

    #[serde(default = "default_bounding_box")]
    pub bounding_box: BoundingBox,
}

impl VoronoiConfig {
    pub fn new(num_units: usize, bounding_box: BoundingBox) -> Self {
        Self {
            num_units,
            bounding_box,
        }
    }

    /// Use the bounding rectangle of a fetched boundary as the region
    pub fn from_boundary(num_units: usize, boundary: &MultiPolygon<f64>) -> Result<Self> {
        let rect = boundary.bounding_rect().ok_or_else(|| {
            Error::Validation("Boundary has no geometry to derive a region from".to_string())
        })?;
        Ok(Self::new(num_units, BoundingBox::from_rect(rect)?))
    }
}

/// One Gaussian peak of an inhomogeneous Poisson model
///
/// Written as `[center_x, center_y, weight, spread]` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct IntensityPeak {
    pub center_x: f64,
    pub center_y: f64,
    /// Truncated to an integer and used as the number of points drawn
    pub weight: f64,
    /// Standard deviation on each axis
    pub spread: f64,
}

impl IntensityPeak {
    pub fn new(center_x: f64, center_y: f64, weight: f64, spread: f64) -> Self {
        Self {
            center_x,
            center_y,
            weight,
            spread,
        }
    }
}

impl From<[f64; 4]> for IntensityPeak {
    fn from(p: [f64; 4]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
}

impl From<IntensityPeak> for [f64; 4] {
    fn from(p: IntensityPeak) -> Self {
        [p.center_x, p.center_y, p.weight, p.spread]
    }
}

/// Stochastic point process used to place generated points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DistributionConfig {
    /// Constant intensity (points per unit area) over the whole box
    HomogeneousPoisson { intensity: f64 },

    /// Gaussian blobs around fixed peaks
    InhomogeneousPoisson { peaks: Vec<IntensityPeak> },

    /// Uniform parents, each scattering offspring in a disk
    NeymanScott {
        parent_intensity: f64,
        offspring_per_parent: usize,
        offspring_radius: f64,
    },
}

impl DistributionConfig {
    /// The model name this variant is configured with
    pub fn model(&self) -> DistributionModel {
        match self {
            Self::HomogeneousPoisson { .. } => DistributionModel::HomogeneousPoisson,
            Self::InhomogeneousPoisson { .. } => DistributionModel::InhomogeneousPoisson,
            Self::NeymanScott { .. } => DistributionModel::NeymanScott,
        }
    }
}

/// Names of the supported point process models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionModel {
    HomogeneousPoisson,
    InhomogeneousPoisson,
    NeymanScott,
}

impl fmt::Display for DistributionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HomogeneousPoisson => write!(f, "homogeneous_poisson"),
            Self::InhomogeneousPoisson => write!(f, "inhomogeneous_poisson"),
            Self::NeymanScott => write!(f, "neyman_scott"),
        }
    }
}

impl FromStr for DistributionModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Only the tags the config deserializer accepts
        match s {
            "homogeneous_poisson" => Ok(Self::HomogeneousPoisson),
            "inhomogeneous_poisson" => Ok(Self::InhomogeneousPoisson),
            "neyman_scott" => Ok(Self::NeymanScott),
            _ => Err(Error::NotSupported(format!(
                "Distribution type '{}' not yet implemented",
                s
            ))),
        }
    }
}

/// Subsampling of an existing tabular source
///
/// Sampling always draws with the fixed seed
/// [`SAMPLING_SEED`](crate::constants::sampling::SAMPLING_SEED), not with
/// [`DataGeneratorConfig::random_seed`]. The same source and fraction select
/// the same rows in every run regardless of the run seed; the run seed
/// still controls the partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// CSV file with `latitude` and `longitude` columns
    pub source_path: PathBuf,

    /// Sampling method; only "proportional" is supported
    #[serde(default = "default_sampling_method")]
    pub method: String,

    /// Fraction of rows kept, in (0, 1]
    #[serde(default = "default_sampling_fraction")]
    pub fraction: f64,
}

impl SamplingConfig {
    pub fn new(source_path: impl Into<PathBuf>, fraction: f64) -> Self {
        Self {
            source_path: source_path.into(),
            method: default_sampling_method(),
            fraction,
        }
    }
}

/// Supported sampling methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMethod {
    /// Uniform subsampling without replacement
    Proportional,
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proportional => write!(f, "proportional"),
        }
    }
}

impl FromStr for SamplingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "proportional" => Ok(Self::Proportional),
            _ => Err(Error::NotSupported(format!(
                "Sampling method '{}' is not supported",
                s
            ))),
        }
    }
}

/// Top-level configuration of one generation run
///
/// The point source is chosen by which optional section is present.
/// Sampling wins when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataGeneratorConfig {
    /// Seeds the partition and distribution draws
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    #[serde(rename = "voronoi")]
    pub voronoi_config: VoronoiConfig,

    #[serde(
        rename = "distribution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub distribution_config: Option<DistributionConfig>,

    #[serde(rename = "sampling", default, skip_serializing_if = "Option::is_none")]
    pub sampling_config: Option<SamplingConfig>,
}

/// Where the points of a run come from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointSource<'a> {
    Sampling(&'a SamplingConfig),
    Distribution(&'a DistributionConfig),
}

impl DataGeneratorConfig {
    /// Configuration with no point source yet
    pub fn new(voronoi_config: VoronoiConfig, random_seed: u64) -> Self {
        Self {
            random_seed,
            voronoi_config,
            distribution_config: None,
            sampling_config: None,
        }
    }

    pub fn with_distribution(mut self, distribution: DistributionConfig) -> Self {
        self.distribution_config = Some(distribution);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling_config = Some(sampling);
        self
    }

    /// Resolve the point source
    ///
    /// Sampling takes precedence over a distribution model. Neither being
    /// present is a configuration error.
    pub fn point_source(&self) -> Result<PointSource<'_>> {
        match (&self.sampling_config, &self.distribution_config) {
            (Some(sampling), _) => Ok(PointSource::Sampling(sampling)),
            (None, Some(distribution)) => Ok(PointSource::Distribution(distribution)),
            (None, None) => Err(Error::Config(
                "Either distribution_config or sampling_config must be provided".to_string(),
            )),
        }
    }

    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML document
    ///
    /// An unknown `distribution.model` is reported as NotSupported rather
    /// than as a parse failure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        if let Some(model) = value
            .get("distribution")
            .and_then(|d| d.get("model"))
            .and_then(|m| m.as_str())
        {
            model.parse::<DistributionModel>()?;
        }

        value
            .try_into()
            .map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

// Default value functions for serde
fn default_bounding_box() -> BoundingBox {
    BoundingBox::default()
}
fn default_random_seed() -> u64 {
    DEFAULT_RANDOM_SEED
}
fn default_sampling_method() -> String {
    DEFAULT_SAMPLING_METHOD.to_string()
}
fn default_sampling_fraction() -> f64 {
    DEFAULT_SAMPLING_FRACTION
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_UNITS, default_bounding_box())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use tempfile::TempDir;

    fn base_config() -> DataGeneratorConfig {
        DataGeneratorConfig::new(
            VoronoiConfig::new(10, BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap()),
            42,
        )
    }

    #[test]
    fn test_point_source_requires_one_section() {
        let config = base_config();
        let err = config.point_source().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("distribution_config or sampling_config"));
    }

    #[test]
    fn test_point_source_prefers_sampling() {
        let config = base_config()
            .with_distribution(DistributionConfig::HomogeneousPoisson { intensity: 1.0 })
            .with_sampling(SamplingConfig::new("customers.csv", 0.5));

        assert!(matches!(
            config.point_source().unwrap(),
            PointSource::Sampling(_)
        ));
    }

    #[test]
    fn test_point_source_distribution() {
        let config =
            base_config().with_distribution(DistributionConfig::HomogeneousPoisson { intensity: 1.0 });
        assert!(matches!(
            config.point_source().unwrap(),
            PointSource::Distribution(DistributionConfig::HomogeneousPoisson { .. })
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config = DataGeneratorConfig::from_toml_str(
            r#"
            random_seed = 7

            [voronoi]
            num_units = 5
            bounding_box = [0.0, 0.0, 10.0, 20.0]

            [distribution]
            model = "inhomogeneous_poisson"
            peaks = [[2.0, 2.0, 20.0, 1.0], [8.0, 8.0, 30.0, 2.0]]
            "#,
        )
        .unwrap();

        assert_eq!(config.random_seed, 7);
        assert_eq!(config.voronoi_config.num_units, 5);
        assert_eq!(config.voronoi_config.bounding_box.max_y(), 20.0);
        assert_eq!(
            config.distribution_config,
            Some(DistributionConfig::InhomogeneousPoisson {
                peaks: vec![
                    IntensityPeak::new(2.0, 2.0, 20.0, 1.0),
                    IntensityPeak::new(8.0, 8.0, 30.0, 2.0),
                ]
            })
        );
        assert!(config.sampling_config.is_none());
    }

    #[test]
    fn test_parse_toml_defaults() {
        let config = DataGeneratorConfig::from_toml_str(
            r#"
            [voronoi]
            num_units = 3

            [sampling]
            source_path = "customers.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.random_seed, DEFAULT_RANDOM_SEED);
        assert_eq!(config.voronoi_config.bounding_box.max_x(), 100.0);
        let sampling = config.sampling_config.unwrap();
        assert_eq!(sampling.method, "proportional");
        assert_eq!(sampling.fraction, 0.5);
    }

    #[test]
    fn test_unknown_model_is_not_supported() {
        let result = DataGeneratorConfig::from_toml_str(
            r#"
            [voronoi]
            num_units = 3

            [distribution]
            model = "matern_cluster"
            "#,
        );
        match result {
            Err(Error::NotSupported(msg)) => assert!(msg.contains("matern_cluster")),
            other => panic!("expected NotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_bounding_box_rejected() {
        let result = DataGeneratorConfig::from_toml_str(
            r#"
            [voronoi]
            num_units = 3
            bounding_box = [10.0, 0.0, 0.0, 10.0]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_model_from_str() {
        for model in [
            DistributionModel::HomogeneousPoisson,
            DistributionModel::InhomogeneousPoisson,
            DistributionModel::NeymanScott,
        ] {
            assert_eq!(model.to_string().parse::<DistributionModel>().unwrap(), model);
        }
        for name in ["thomas", "neyman-scott", "NeymanScott"] {
            assert!(matches!(
                name.parse::<DistributionModel>(),
                Err(Error::NotSupported(_))
            ));
        }
        assert_eq!(DistributionModel::NeymanScott.to_string(), "neyman_scott");
    }

    #[test]
    fn test_non_snake_case_model_reported_as_unsupported() {
        let result = DataGeneratorConfig::from_toml_str(
            r#"
            [voronoi]
            num_units = 3

            [distribution]
            model = "NeymanScott"
            parent_intensity = 0.1
            offspring_per_parent = 3
            offspring_radius = 1.0
            "#,
        );
        match result {
            Err(Error::NotSupported(msg)) => assert!(msg.contains("NeymanScott")),
            other => panic!("expected NotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_sampling_method_from_str() {
        assert_eq!(
            "proportional".parse::<SamplingMethod>().unwrap(),
            SamplingMethod::Proportional
        );
        assert!(matches!(
            "stratified".parse::<SamplingMethod>(),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = base_config().with_distribution(DistributionConfig::NeymanScott {
            parent_intensity: 0.1,
            offspring_per_parent: 5,
            offspring_radius: 1.0,
        });
        config.save(&path).unwrap();

        let loaded = DataGeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = DataGeneratorConfig::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_voronoi_from_boundary() {
        let boundary = MultiPolygon::new(vec![polygon![
            (x: 2.0, y: 1.0),
            (x: 6.0, y: 1.0),
            (x: 4.0, y: 9.0),
        ]]);
        let config = VoronoiConfig::from_boundary(12, &boundary).unwrap();
        assert_eq!(config.num_units, 12);
        assert_eq!(
            <[f64; 4]>::from(config.bounding_box),
            [2.0, 1.0, 6.0, 9.0]
        );

        let empty: MultiPolygon<f64> = MultiPolygon::new(vec![]);
        assert!(VoronoiConfig::from_boundary(3, &empty).is_err());
    }
}
