//! Name to group directory

use crate::group::{Group, GroupBuilder};
use meshcache_core::{DataSource, Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Directory of the groups a process serves.
///
/// Construct one per process (or per test) and share it by reference; peer
/// transports use it to find the group a [`FetchRequest`] names.
///
/// [`FetchRequest`]: meshcache_core::FetchRequest
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built group under its name
    pub fn register(&self, group: Group) -> Result<Arc<Group>> {
        let mut groups = self.groups.write();
        if groups.contains_key(group.name()) {
            return Err(Error::duplicate_group(group.name()));
        }

        let group = Arc::new(group);
        groups.insert(group.name().to_string(), Arc::clone(&group));
        tracing::debug!(group = group.name(), "registered group");
        Ok(group)
    }

    /// Build a group from `builder` and register it
    pub fn register_builder(&self, builder: GroupBuilder) -> Result<Arc<Group>> {
        self.register(builder.build()?)
    }

    /// Create and register a group with the given cache budget and data source
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: u64,
        data_source: Arc<dyn DataSource>,
    ) -> Result<Arc<Group>> {
        self.register(Group::new(name, cache_bytes, data_source))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}
