//! Group Registry
//!
//! Maps group names to groups for everything that needs to find one by name,
//! chiefly the HTTP handlers. Registration is append-only: a group lives as
//! long as the registry that holds it.

use super::group::Group;
use super::loader::LoaderFn;
use crate::error::{CacheError, Result};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Builds a group with the given budget and loader and registers it.
    pub fn new_group(&self, name: &str, max_bytes: u64, loader: LoaderFn) -> Result<Arc<Group>> {
        let group = Group::builder(name)
            .max_bytes(max_bytes)
            .loader(loader)
            .build()?;
        self.register(group)
    }

    /// Registers a group built elsewhere.
    ///
    /// # Returns
    /// * `Err(CacheError::DuplicateGroup)` if the name is already taken; the
    ///   existing group is left in place.
    pub fn register(&self, group: Group) -> Result<Arc<Group>> {
        let mut groups = self.groups.write();
        if groups.contains_key(group.name()) {
            return Err(CacheError::DuplicateGroup(group.name().to_string()));
        }

        let group = Arc::new(group);
        groups.insert(group.name().to_string(), group.clone());

        tracing::info!("Registered cache group: {}", group.name());
        Ok(group)
    }

    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns all registered groups, sorted by name.
    pub fn groups(&self) -> Vec<Arc<Group>> {
        let mut groups: Vec<Arc<Group>> = self.groups.read().values().cloned().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().len()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }
}
