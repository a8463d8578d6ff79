//! Class Registry
//!
//! In-memory store of class records. The primary map owns every record;
//! the base-class and short-name indices hold keys into it, in insertion
//! order. Every mutation updates all three maps before returning.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

use super::types::ClassRecord;
use crate::common::ManifestResult;

#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    /// Full class name → record
    classes: BTreeMap<String, ClassRecord>,
    /// Base class name → full class names
    by_base_class: HashMap<String, Vec<String>>,
    /// Class name without namespace → full class names
    by_short_name: HashMap<String, Vec<String>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a batch of records, replacing existing entries with the same
    /// full class name. Invalid records are skipped.
    ///
    /// Returns the number of records stored.
    pub fn insert<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ClassRecord>,
    {
        let mut inserted = 0;
        for record in records {
            match self.insert_one(record) {
                Ok(_) => inserted += 1,
                Err(e) => warn!("Skipping class: {}", e),
            }
        }
        inserted
    }

    /// Insert a single record, returning the one it replaced
    pub fn insert_one(&mut self, record: ClassRecord) -> ManifestResult<Option<ClassRecord>> {
        record.validate()?;

        let key = record.full_class_name.clone();
        let replaced = self.remove_entry(&key);
        if let Some(old) = &replaced {
            debug!(
                "Class {} from {:?} replaced by {:?}",
                key, old.source_manifest_path, record.source_manifest_path
            );
        }

        self.by_base_class
            .entry(record.base_class_name.clone())
            .or_default()
            .push(key.clone());
        self.by_short_name
            .entry(record.short_name().to_string())
            .or_default()
            .push(key.clone());
        self.classes.insert(key, record);

        Ok(replaced)
    }

    /// Remove a class from every index. Returns false if it was not present.
    pub fn remove(&mut self, full_class_name: &str) -> bool {
        self.remove_entry(full_class_name).is_some()
    }

    fn remove_entry(&mut self, full_class_name: &str) -> Option<ClassRecord> {
        let record = self.classes.remove(full_class_name)?;
        remove_from_bucket(&mut self.by_base_class, &record.base_class_name, full_class_name);
        remove_from_bucket(&mut self.by_short_name, record.short_name(), full_class_name);
        Some(record)
    }

    pub fn clear(&mut self) {
        self.classes.clear();
        self.by_base_class.clear();
        self.by_short_name.clear();
    }

    pub fn get(&self, full_class_name: &str) -> Option<&ClassRecord> {
        self.classes.get(full_class_name)
    }

    pub fn contains(&self, full_class_name: &str) -> bool {
        self.classes.contains_key(full_class_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All records, ordered by full class name
    pub fn records(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.values()
    }

    /// All full class names, sorted
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Records deriving from `base_class_name`, in insertion order
    pub fn find_by_base_class(&self, base_class_name: &str) -> Vec<&ClassRecord> {
        self.resolve_bucket(self.by_base_class.get(base_class_name))
    }

    /// Records whose name without namespace is `short_name`, in insertion order
    pub fn find_by_short_name(&self, short_name: &str) -> Vec<&ClassRecord> {
        self.resolve_bucket(self.by_short_name.get(short_name))
    }

    /// First record deriving from `base_class_name` whose embedded type is
    /// `embedded_type`
    pub fn find_associated_of_embedded_type(
        &self,
        embedded_type: &str,
        base_class_name: &str,
    ) -> Option<&ClassRecord> {
        self.find_by_base_class(base_class_name)
            .into_iter()
            .find(|record| record.embedded_type() == Some(embedded_type))
    }

    /// Distinct library paths of all records
    pub fn libraries(&self) -> BTreeSet<String> {
        self.classes
            .values()
            .map(|record| record.library_path.clone())
            .collect()
    }

    /// True when both secondary indices reference exactly the stored records
    pub fn is_consistent(&self) -> bool {
        self.index_matches(&self.by_base_class, |r| r.base_class_name.as_str())
            && self.index_matches(&self.by_short_name, ClassRecord::short_name)
    }

    fn index_matches(
        &self,
        index: &HashMap<String, Vec<String>>,
        key_of: fn(&ClassRecord) -> &str,
    ) -> bool {
        let indexed: usize = index.values().map(Vec::len).sum();
        indexed == self.classes.len()
            && index.iter().all(|(key, bucket)| {
                !bucket.is_empty()
                    && bucket.iter().all(|name| {
                        self.classes
                            .get(name)
                            .is_some_and(|record| key_of(record) == key.as_str())
                    })
            })
    }

    fn resolve_bucket(&self, bucket: Option<&Vec<String>>) -> Vec<&ClassRecord> {
        bucket
            .map(|names| names.iter().filter_map(|name| self.classes.get(name)).collect())
            .unwrap_or_default()
    }
}

fn remove_from_bucket(index: &mut HashMap<String, Vec<String>>, key: &str, full_class_name: &str) {
    if let Some(bucket) = index.get_mut(key) {
        bucket.retain(|name| name != full_class_name);
        if bucket.is_empty() {
            index.remove(key);
        }
    }
}
