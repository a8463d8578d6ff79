//! Manifest Types
//!
//! The class record produced for every `<class>` entry of a manifest.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::{ManifestError, ManifestResult};
use crate::names;

/// Metadata of one pluggable class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Unique key, e.g. `ns::Handler<int>`
    pub full_class_name: String,
    pub base_class_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_singleton: bool,
    /// Binary artifact that implements the class, opaque to the registry
    pub library_path: String,
    #[serde(default)]
    pub associated_classes: Vec<String>,
    /// Manifest the record was parsed from
    #[serde(default)]
    pub source_manifest_path: PathBuf,
}

impl ClassRecord {
    pub fn new(
        full_class_name: impl Into<String>,
        base_class_name: impl Into<String>,
        library_path: impl Into<String>,
    ) -> Self {
        Self {
            full_class_name: full_class_name.into(),
            base_class_name: base_class_name.into(),
            description: None,
            is_singleton: false,
            library_path: library_path.into(),
            associated_classes: Vec::new(),
            source_manifest_path: PathBuf::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_singleton(mut self, is_singleton: bool) -> Self {
        self.is_singleton = is_singleton;
        self
    }

    pub fn with_associated_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associated_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_manifest_path = path.into();
        self
    }

    /// Class name without namespace
    pub fn short_name(&self) -> &str {
        names::remove_namespace(&self.full_class_name)
    }

    pub fn has_embedded_type(&self) -> bool {
        names::has_embedded_type(&self.full_class_name)
    }

    /// Embedded type, e.g. `int` for `Handler<int>`
    pub fn embedded_type(&self) -> Option<&str> {
        self.has_embedded_type()
            .then(|| names::extract_embedded_type(&self.full_class_name))
    }

    /// Class name with the embedded-type suffix removed
    pub fn base_type(&self) -> &str {
        names::extract_base_type(&self.full_class_name)
    }

    /// Check the fields every stored record must carry
    pub fn validate(&self) -> ManifestResult<()> {
        let reason = if self.full_class_name.is_empty() {
            "empty class name"
        } else if self.base_class_name.is_empty() {
            "empty base class name"
        } else if self.library_path.is_empty() {
            "empty library path"
        } else {
            return Ok(());
        };

        Err(ManifestError::InvalidRecord {
            class: self.full_class_name.clone(),
            reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_names() {
        let record = ClassRecord::new("ns::Handler<int>", "ns::Base", "/lib/handlers.so");
        assert_eq!(record.short_name(), "Handler<int>");
        assert!(record.has_embedded_type());
        assert_eq!(record.embedded_type(), Some("int"));
        assert_eq!(record.base_type(), "ns::Handler");
    }

    #[test]
    fn test_embedded_type_absent() {
        let record = ClassRecord::new("Plain", "Base", "/lib/plain.so");
        assert!(!record.has_embedded_type());
        assert_eq!(record.embedded_type(), None);
        assert_eq!(record.base_type(), "Plain");
    }

    #[test]
    fn test_validate() {
        assert!(ClassRecord::new("A", "Base", "/lib/a.so").validate().is_ok());
        assert!(ClassRecord::new("A", "", "/lib/a.so").validate().is_err());
        assert!(ClassRecord::new("A", "Base", "").validate().is_err());
        assert!(ClassRecord::new("", "Base", "/lib/a.so").validate().is_err());
    }

    #[test]
    fn test_builder() {
        let record = ClassRecord::new("A", "Base", "/lib/a.so")
            .with_description("An A")
            .with_singleton(true)
            .with_associated_classes(["B", "C"])
            .with_source("/etc/a.xml");
        assert_eq!(record.description.as_deref(), Some("An A"));
        assert!(record.is_singleton);
        assert_eq!(record.associated_classes, vec!["B", "C"]);
        assert_eq!(record.source_manifest_path, PathBuf::from("/etc/a.xml"));
    }
}
