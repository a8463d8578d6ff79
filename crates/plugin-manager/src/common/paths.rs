//! Path Utilities
//!
//! Location of the per-user plugin manager configuration.

use std::path::PathBuf;

use super::error::ConfigError;

/// Get the plugin manager config directory (`<config dir>/plugin_manager/`)
pub fn plugin_manager_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("plugin_manager"))
}

/// Get the default registry configuration file
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(plugin_manager_dir()?.join("config.json"))
}
