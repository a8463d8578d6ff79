//! Common Error Types
//!
//! Failures raised while reading manifests and configuration. Lookup misses
//! are not errors; the query API reports them through `Option` and `bool`.

use std::path::PathBuf;

use quick_xml::events::attributes::AttrError;

/// Reasons a manifest file is rejected as a whole
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest file too large ({0} bytes, max 1MB)")]
    TooLarge(u64),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid singleton value '{0}' (expected true or false)")]
    InvalidSingleton(String),

    #[error("<{0}> is not allowed here")]
    UnexpectedElement(String),

    #[error("Manifest declares no <library> element")]
    NoLibrary,

    #[error("Library '{0}' declares no classes")]
    NoClasses(String),

    #[error("Manifest ended inside an open element")]
    UnexpectedEof,

    #[error("Invalid class record '{class}': {reason}")]
    InvalidRecord { class: String, reason: String },
}

/// Failures while loading a `RegistryConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_message() {
        let err = ManifestError::MissingAttribute {
            element: "class",
            attribute: "base_class_name",
        };
        assert_eq!(
            err.to_string(),
            "<class> is missing required attribute 'base_class_name'"
        );
    }

    #[test]
    fn test_invalid_record_message() {
        let err = ManifestError::InvalidRecord {
            class: "ns::Plugin".to_string(),
            reason: "empty library path".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid class record 'ns::Plugin': empty library path"
        );
    }
}
