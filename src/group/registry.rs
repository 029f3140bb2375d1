//! Group Registry
//!
//! Maps group names to their `CacheGroup`. Built once at startup and handed to whatever
//! serves requests, so there is exactly one group instance per name per process.

use dashmap::DashMap;
use std::sync::Arc;

use super::cache_group::CacheGroup;
use super::loader::Loader;

pub struct Registry {
    groups: DashMap<String, Arc<CacheGroup>>,
}

impl Registry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates and registers a group with a `cache_bytes` LRU budget.
    pub fn create_group(&self, name: &str, cache_bytes: usize, loader: Arc<dyn Loader>) -> Arc<CacheGroup> {
        self.insert(CacheGroup::new(name, cache_bytes, loader))
    }

    /// Registers a prebuilt group, replacing any group of the same name.
    pub fn insert(&self, group: CacheGroup) -> Arc<CacheGroup> {
        let group = Arc::new(group);
        if self
            .groups
            .insert(group.name().to_string(), group.clone())
            .is_some()
        {
            tracing::warn!("Replaced existing group: {}", group.name());
        } else {
            tracing::info!("Registered group: {}", group.name());
        }
        group
    }

    pub fn get_group(&self, name: &str) -> Option<Arc<CacheGroup>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Sorted names of all registered groups.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
