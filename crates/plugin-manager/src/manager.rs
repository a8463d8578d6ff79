//! Plugin Manager
//!
//! Facade over discovery, parsing and the class registry. A reload always
//! rebuilds the registry from scratch; there is no incremental update.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::discovery::PathDiscovery;
use crate::manifest::{loader, ClassRecord, ClassRegistry};
use crate::names;

/// Outcome of a [`PluginManager::reload`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    pub files_scanned: usize,
    pub files_rejected: usize,
    pub classes_loaded: usize,
}

/// Registry of plugin class metadata loaded from XML manifests
#[derive(Debug, Clone)]
pub struct PluginManager {
    /// Explicit manifest files and folders
    plugin_xml_paths: Vec<PathBuf>,
    load_environment_paths: bool,
    discovery: PathDiscovery,
    registry: ClassRegistry,
}

impl PluginManager {
    /// Create a manager and load every manifest found
    pub fn new<I, P>(plugin_xml_paths: I, load_environment_paths: bool) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::from_config(&RegistryConfig::with_paths(plugin_xml_paths, load_environment_paths))
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut manager = Self {
            plugin_xml_paths: config.plugin_xml_paths.clone(),
            load_environment_paths: config.load_environment_paths,
            discovery: PathDiscovery::from_config(config),
            registry: ClassRegistry::new(),
        };
        manager.reload();
        manager
    }

    /// Manifest files that a reload would parse right now
    pub fn plugin_xml_paths(&self) -> Vec<PathBuf> {
        self.discovery
            .resolve_all(&self.plugin_xml_paths, self.load_environment_paths)
    }

    /// Re-read every manifest and rebuild the registry
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn reload(&mut self) -> ReloadSummary {
        let files = self.plugin_xml_paths();
        let mut summary = ReloadSummary {
            files_scanned: files.len(),
            ..ReloadSummary::default()
        };

        let mut classes = Vec::new();
        for file in &files {
            match loader::parse_file(file) {
                Ok(records) => classes.extend(records),
                Err(e) => {
                    warn!("Failed to load manifest {:?}: {}", file, e);
                    summary.files_rejected += 1;
                }
            }
        }

        self.registry.clear();
        self.registry.insert(classes);
        summary.classes_loaded = self.registry.len();

        info!(
            "Plugin registry loaded: {} classes from {} manifests ({} rejected)",
            summary.classes_loaded, summary.files_scanned, summary.files_rejected
        );
        summary
    }

    /// Replace the explicit manifest paths and reload
    pub fn override_paths<I, P>(&mut self, plugin_xml_paths: I) -> ReloadSummary
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.plugin_xml_paths = plugin_xml_paths.into_iter().map(Into::into).collect();
        self.reload()
    }

    /// Register records directly, replacing entries with the same name
    pub fn insert_class_infos<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ClassRecord>,
    {
        self.registry.insert(records)
    }

    pub fn remove_class_info(&mut self, class_name: &str) -> bool {
        self.registry.remove(class_name)
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Read-only view of the underlying registry
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Full class names of all registered classes, sorted
    pub fn available_classes(&self) -> Vec<String> {
        self.registry.class_names().map(str::to_string).collect()
    }

    /// Full class names deriving from `base_class`, in registration order
    pub fn available_classes_of(&self, base_class: &str) -> Vec<String> {
        self.registry
            .find_by_base_class(base_class)
            .into_iter()
            .map(|record| record.full_class_name.clone())
            .collect()
    }

    pub fn is_class_info_available(&self, class_name: &str) -> bool {
        self.registry.contains(class_name)
    }

    /// Copy of the full record of a class
    pub fn class_info(&self, class_name: &str) -> Option<ClassRecord> {
        self.registry.get(class_name).cloned()
    }

    pub fn base_class(&self, class_name: &str) -> Option<String> {
        self.registry
            .get(class_name)
            .map(|record| record.base_class_name.clone())
    }

    /// Associated classes of a class, `None` if it has none
    pub fn associated_classes(&self, class_name: &str) -> Option<Vec<String>> {
        self.registry
            .get(class_name)
            .filter(|record| !record.associated_classes.is_empty())
            .map(|record| record.associated_classes.clone())
    }

    /// Description of a class; empty when the manifest gave none
    pub fn class_description(&self, class_name: &str) -> Option<String> {
        self.registry
            .get(class_name)
            .map(|record| record.description.clone().unwrap_or_default())
    }

    pub fn singleton_flag(&self, class_name: &str) -> Option<bool> {
        self.registry.get(class_name).map(|record| record.is_singleton)
    }

    pub fn class_library_path(&self, class_name: &str) -> Option<String> {
        self.registry
            .get(class_name)
            .map(|record| record.library_path.clone())
    }

    /// Resolve a class name without namespace to its full name
    ///
    /// A registered full name resolves to itself. When several namespaces
    /// define the same short name the first registered one is returned.
    pub fn full_class_name(&self, class_name: &str) -> Option<String> {
        if self.registry.contains(class_name) {
            return Some(class_name.to_string());
        }
        if names::has_namespace(class_name) {
            return None;
        }
        self.registry
            .find_by_short_name(class_name)
            .first()
            .map(|record| record.full_class_name.clone())
    }

    /// First class deriving from `base_class_name` whose embedded type is
    /// `embedded_type`, e.g. `Handler<int>` for `int`
    pub fn associated_class_of_type(
        &self,
        embedded_type: &str,
        base_class_name: &str,
    ) -> Option<String> {
        self.registry
            .find_associated_of_embedded_type(embedded_type, base_class_name)
            .map(|record| record.full_class_name.clone())
    }

    /// Libraries that provide at least one registered class
    pub fn registered_libraries(&self) -> BTreeSet<String> {
        self.registry.libraries()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::from_config(&RegistryConfig::default())
    }
}
