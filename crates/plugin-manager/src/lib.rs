//! Plugin Manager
//!
//! Metadata registry for pluggable classes. XML manifests describe which
//! library implements a class, the base class it derives from and a few
//! loader hints; [`PluginManager`] discovers those manifests, indexes their
//! classes and answers lookups by full name, short name, base class or
//! embedded type. Loading the libraries themselves is left to the caller.

pub mod common;
pub mod config;
pub mod discovery;
pub mod downcast;
pub mod manager;
pub mod manifest;
pub mod names;

pub use common::{ConfigError, ManifestError};
pub use config::RegistryConfig;
pub use discovery::PathDiscovery;
pub use downcast::{downcast, DowncastError};
pub use manager::{PluginManager, ReloadSummary};
pub use manifest::{ClassRecord, ClassRegistry};
