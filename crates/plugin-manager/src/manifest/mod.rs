//! Manifest System
//!
//! Parses plugin manifests into class records and indexes them for lookup.

pub mod loader;
pub mod registry;
pub mod types;

pub use loader::{parse_file, parse_str};
pub use registry::ClassRegistry;
pub use types::ClassRecord;
