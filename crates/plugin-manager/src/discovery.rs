//! Manifest Path Discovery
//!
//! Turns explicit paths and environment install prefixes into the ordered
//! list of manifest files to parse.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::RegistryConfig;

/// Locates manifest files on disk
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    environment_variable: String,
    install_subdirectory: PathBuf,
    manifest_extension: String,
}

impl PathDiscovery {
    pub fn new(
        environment_variable: impl Into<String>,
        install_subdirectory: impl Into<PathBuf>,
        manifest_extension: impl Into<String>,
    ) -> Self {
        Self {
            environment_variable: environment_variable.into(),
            install_subdirectory: install_subdirectory.into(),
            manifest_extension: manifest_extension.into(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(
            config.environment_variable.clone(),
            config.install_subdirectory.clone(),
            config.manifest_extension.clone(),
        )
    }

    /// Manifest folders below the install prefixes listed in the environment
    ///
    /// Only existing folders are returned, deduplicated, in scan order.
    pub fn paths_from_environment(&self) -> Vec<PathBuf> {
        match std::env::var_os(&self.environment_variable) {
            Some(value) => self.paths_from_prefixes(&value),
            None => {
                debug!("{} is not set, skipping environment scan", self.environment_variable);
                Vec::new()
            }
        }
    }

    /// Same as [`paths_from_environment`](Self::paths_from_environment) for
    /// an explicit separator-delimited prefix list
    pub fn paths_from_prefixes(&self, prefixes: &OsStr) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut folders = Vec::new();

        for prefix in std::env::split_paths(prefixes) {
            if prefix.as_os_str().is_empty() {
                continue;
            }
            let folder = prefix.join(&self.install_subdirectory);
            if !folder.is_dir() {
                debug!("Manifest folder does not exist: {:?}", folder);
                continue;
            }
            if seen.insert(folder.clone()) {
                folders.push(folder);
            }
        }

        folders
    }

    /// Manifest files directly inside `folder` (non-recursive)
    pub fn files_in_folder(&self, folder: &Path) -> BTreeSet<PathBuf> {
        let mut files = BTreeSet::new();

        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Failed to read directory {:?}: {}", folder, e);
                return files;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();

            // Skip dotfiles
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    continue;
                }
            }

            if path.is_file() && self.has_manifest_extension(&path) {
                files.insert(path);
            }
        }

        files
    }

    /// Every manifest file to parse: explicit paths first, then the
    /// environment folders when `load_environment_paths` is set
    pub fn resolve_all(&self, explicit: &[PathBuf], load_environment_paths: bool) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        let mut push = |file: PathBuf| {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        };

        for path in explicit {
            if path.is_dir() {
                self.files_in_folder(path).into_iter().for_each(&mut push);
            } else if path.is_file() {
                push(path.clone());
            } else {
                debug!("Manifest path does not exist: {:?}", path);
            }
        }

        if load_environment_paths {
            for folder in self.paths_from_environment() {
                self.files_in_folder(&folder).into_iter().for_each(&mut push);
            }
        }

        files
    }

    fn has_manifest_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some(self.manifest_extension.as_str())
    }
}

impl Default for PathDiscovery {
    fn default() -> Self {
        Self::from_config(&RegistryConfig::default())
    }
}
