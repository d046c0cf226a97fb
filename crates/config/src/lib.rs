pub mod schema;
pub mod watcher;

pub use schema::{
    HistoryConfig, RenderConfig, SourceConfig, SourceKind, ThresholdConfig, VigilConfig,
};
pub use watcher::ConfigWatcher;

use std::path::{Path, PathBuf};
use vigil_core::{Result, VigilError};

/// Load configuration from a TOML file.  Returns `VigilConfig::default()` if
/// the file doesn't exist so the dashboard always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(VigilConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| VigilError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: VigilConfig =
        toml::from_str(&raw).map_err(|e| VigilError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the config path: `$VIGIL_CONFIG` if set, otherwise
/// `vigil/vigil.toml` under `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    if let Ok(explicit) = std::env::var("VIGIL_CONFIG") {
        return PathBuf::from(explicit);
    }

    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vigil").join("vigil.toml")
}
