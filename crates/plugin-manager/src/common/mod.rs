//! Common Utilities
//!
//! Error types, result aliases and path helpers shared across the crate.

pub mod error;
pub mod paths;
pub mod result;

pub use error::{ConfigError, ManifestError};
pub use paths::{default_config_path, plugin_manager_dir};
pub use result::{ConfigResult, ManifestResult};
