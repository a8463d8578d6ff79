//! Common Result Types

use super::error::{ConfigError, ManifestError};

/// Result of reading or interpreting a single manifest file
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Result of loading a registry configuration file
pub type ConfigResult<T> = Result<T, ConfigError>;
