//! Config command handler
//!
//! Show, locate and initialize the generator configuration.

use crate::config::defaults::{DEFAULT_INTENSITY, DEFAULT_RANDOM_SEED};
use crate::config::{DataGeneratorConfig, DistributionConfig, VoronoiConfig};
use crate::error::{Error, Result};
use clap::Args;
use std::path::{Path, PathBuf};

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Config file (defaults to the user config location)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Write a starter config file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    let path = match args.config {
        Some(path) => path,
        None => DataGeneratorConfig::default_path()?,
    };

    // Show path
    if args.path {
        println!("{}", path.display());
        return Ok(());
    }

    if args.init {
        init(&path, args.force)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let config = DataGeneratorConfig::load(&path)?;
    let content = toml::to_string_pretty(&config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    print!("{}", content);

    Ok(())
}

/// Starter configuration: default region with a homogeneous Poisson model
pub fn starter_config() -> DataGeneratorConfig {
    DataGeneratorConfig::new(VoronoiConfig::default(), DEFAULT_RANDOM_SEED).with_distribution(
        DistributionConfig::HomogeneousPoisson {
            intensity: DEFAULT_INTENSITY,
        },
    )
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }
    starter_config().save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(path: PathBuf) -> ConfigArgs {
        ConfigArgs {
            config: Some(path),
            path: false,
            init: true,
            force: false,
        }
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spatial-synth").join("generator.toml");

        run(args(path.clone())).unwrap();

        let loaded = DataGeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded, starter_config());
        assert!(loaded.point_source().is_ok());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("generator.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(matches!(run(args(path.clone())), Err(Error::Config(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        let mut forced = args(path.clone());
        forced.force = true;
        run(forced).unwrap();
        assert!(DataGeneratorConfig::load(&path).is_ok());
    }

    #[test]
    fn test_show_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let mut show = args(dir.path().join("missing.toml"));
        show.init = false;
        assert!(run(show).is_err());
    }
}
