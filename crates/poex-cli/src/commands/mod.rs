//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use poex_core::PoexConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poex")
        .join("config.json")
}

/// Configuration file to use: the `--config` argument or the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, then the default location, then defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PoexConfig> {
    if let Some(path) = config_path {
        return Ok(PoexConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(PoexConfig::from_file(&path)?)
    } else {
        Ok(PoexConfig::default())
    }
}
