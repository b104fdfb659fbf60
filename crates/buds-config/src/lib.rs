mod prefs;
mod types;

pub use prefs::FilePrefs;
pub use types::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Returns the config directory: <platform config dir>/buds-app/
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("buds-app");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the config file path: <config dir>/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the persisted-state file path: <config dir>/prefs.toml
pub fn prefs_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("prefs.toml"))
}

/// Load config from disk, or return default if not found.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!("No config found, using defaults");
        Ok(AppConfig::default())
    }
}
