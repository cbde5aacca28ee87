//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod resolve;
pub mod text;

use std::path::{Path, PathBuf};

use tracing::debug;

use rdv_core::models::config::RdvConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rdv")
        .join("config.json")
}

/// Configuration file in effect: `--config` if given, else the default path.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration in effect, falling back to defaults when no file exists.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RdvConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let path = default_config_path();
    if path.exists() {
        read_config(&path)
    } else {
        debug!("No config file at {}, using defaults", path.display());
        Ok(RdvConfig::default())
    }
}

fn read_config(path: &Path) -> anyhow::Result<RdvConfig> {
    debug!("Loading config from {}", path.display());
    RdvConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}
