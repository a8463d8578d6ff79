//! Registry Configuration
//!
//! Explicit manifest paths plus the knobs of the environment-driven scan.
//! Stored as JSON; every field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::common::{default_config_path, ConfigError, ConfigResult};

/// Environment variable holding the install prefixes to scan
pub const DEFAULT_ENVIRONMENT_VARIABLE: &str = "PLUGIN_MANAGER_PREFIX_PATH";
/// Folder below each install prefix that holds manifest files
pub const DEFAULT_INSTALL_SUBDIRECTORY: &str = "share/plugin_manager";
/// Extension of manifest files inside a folder
pub const DEFAULT_MANIFEST_EXTENSION: &str = "xml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Manifest files or folders scanned before anything else
    pub plugin_xml_paths: Vec<PathBuf>,
    /// Whether install prefixes from the environment are scanned too
    pub load_environment_paths: bool,
    pub environment_variable: String,
    pub install_subdirectory: PathBuf,
    pub manifest_extension: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            plugin_xml_paths: Vec::new(),
            load_environment_paths: true,
            environment_variable: DEFAULT_ENVIRONMENT_VARIABLE.to_string(),
            install_subdirectory: PathBuf::from(DEFAULT_INSTALL_SUBDIRECTORY),
            manifest_extension: DEFAULT_MANIFEST_EXTENSION.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Config with the given explicit paths and environment flag
    pub fn with_paths<I, P>(paths: I, load_environment_paths: bool) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            plugin_xml_paths: paths.into_iter().map(Into::into).collect(),
            load_environment_paths,
            ..Self::default()
        }
    }

    /// Read a config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded registry config from {:?}", path);
        Ok(config)
    }

    /// Read a config file, or use defaults when it does not exist
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Read the per-user config file, or use defaults
    pub fn load_user() -> ConfigResult<Self> {
        match default_config_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(ConfigError::NoConfigDir) => {
                debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert!(config.plugin_xml_paths.is_empty());
        assert!(config.load_environment_paths);
        assert_eq!(config.environment_variable, DEFAULT_ENVIRONMENT_VARIABLE);
        assert_eq!(config.manifest_extension, "xml");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"plugin_xml_paths": ["/opt/plugins"], "load_environment_paths": false}"#)
                .unwrap();
        assert_eq!(config.plugin_xml_paths, vec![PathBuf::from("/opt/plugins")]);
        assert!(!config.load_environment_paths);
        assert_eq!(
            config.install_subdirectory,
            PathBuf::from(DEFAULT_INSTALL_SUBDIRECTORY)
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"environment_variable": "MY_PREFIXES", "manifest_extension": "plugin"}}"#)
            .unwrap();

        let config = RegistryConfig::load(file.path()).unwrap();
        assert_eq!(config.environment_variable, "MY_PREFIXES");
        assert_eq!(config.manifest_extension, "plugin");
        assert!(config.load_environment_paths);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = RegistryConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegistryConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }
}
