pub mod schema;

pub use schema::{DashConfig, FeedConfig, MapConfig, SeriesConfig, TableConfig};

use agro_core::{DashError, Result};
use std::path::{Path, PathBuf};

/// Read, parse and validate the dashboard configuration at `path`.
///
/// A missing file is not an error: the defaults are returned and a warning
/// is logged. Unreadable files, malformed TOML and values rejected by
/// [`DashConfig::validate`] (zero capacities, an empty colour cycle) all
/// surface as [`DashError::Config`].
pub fn load(path: impl AsRef<Path>) -> Result<DashConfig> {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "no config file; using defaults");
            return Ok(DashConfig::default());
        }
        Err(e) => {
            return Err(DashError::Config(format!("cannot read '{}': {e}", path.display())));
        }
    };

    let config: DashConfig = toml::from_str(&raw)
        .map_err(|e| DashError::Config(format!("{}: {e}", path.display())))?;
    config.validate()?;
    tracing::info!(
        path = %path.display(),
        overall_capacity = config.series.overall_capacity,
        node_capacity = config.series.node_capacity,
        max_rows = config.table.max_rows,
        "config loaded"
    );
    Ok(config)
}

/// Return the default config path, honouring `$AGRODASH_CONFIG` and then
/// `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    if let Ok(explicit) = std::env::var("AGRODASH_CONFIG") {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("agrodash").join("agrodash.toml")
}
