//! Subcommands.

pub mod catalog;
pub mod config;
pub mod inspect;

use std::path::{Path, PathBuf};

use tracing::debug;

use shelfmark_core::CatalogConfig;

/// Per-user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelfmark")
        .join("config.json")
}

/// The `--config` file, else the per-user file.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit `--config` must exist; the per-user file
/// is optional and defaults are used without it.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<CatalogConfig> {
    if let Some(path) = explicit {
        return CatalogConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config {}", path.display());
        Ok(CatalogConfig::from_file(&path)?)
    } else {
        Ok(CatalogConfig::default())
    }
}
