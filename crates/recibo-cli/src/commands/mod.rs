//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod health;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use recibo_core::ReciboConfig;

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recibo")
        .join("config.json")
}

/// The file named by `--config`, or the per-user default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration for a run.
///
/// An explicit `--config` file must exist; the per-user file is optional
/// and defaults apply when it is missing.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ReciboConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let path = default_config_path();
    if path.exists() {
        read_config(&path)
    } else {
        debug!("No config file at {}, using defaults", path.display());
        Ok(ReciboConfig::default())
    }
}

/// Read a receipt file. Bytes that are not UTF-8 (Latin-1 mail exports)
/// are replaced rather than rejected; the markup parser is lenient anyway.
pub fn read_markup(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_config(path: &Path) -> anyhow::Result<ReciboConfig> {
    ReciboConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))
}
