use crate::resource::{Resource, ResourceId};
use std::collections::{HashMap, HashSet};

/// Ownership graph of the status tree: every node by identity, plus
/// parent → children.
///
/// Structural only. Policy (echo suppression, grouping) lives in
/// [`crate::object_tree::ObjectTree`].
#[derive(Debug, Default)]
pub struct ResourceTree {
    items: HashMap<ResourceId, Resource>,
    ownership: HashMap<ResourceId, HashSet<ResourceId>>,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a resource by its identity.
    pub fn put(&mut self, resource: Resource) {
        self.items.insert(resource.id.clone(), resource);
    }

    /// Records `parent` as owner of `child`. Self-links are refused.
    pub fn link(&mut self, parent: &ResourceId, child: &ResourceId) -> bool {
        if parent == child {
            return false;
        }
        self.ownership
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
        true
    }

    pub fn unlink(&mut self, parent: &ResourceId, child: &ResourceId) {
        if let Some(children) = self.ownership.get_mut(parent) {
            children.remove(child);
            if children.is_empty() {
                self.ownership.remove(parent);
            }
        }
    }

    pub fn delete(&mut self, id: &ResourceId) -> Option<Resource> {
        self.items.remove(id)
    }

    /// Unlinks `child` from `parent` and deletes it together with everything
    /// it owns.
    /// Returns the identities removed.
    pub fn purge(
        &mut self,
        parent: &ResourceId,
        child: &ResourceId,
    ) -> Vec<ResourceId> {
        self.unlink(parent, child);
        let mut removed = Vec::new();
        let mut pending = vec![child.clone()];
        while let Some(id) = pending.pop() {
            if let Some(children) = self.ownership.remove(&id) {
                pending.extend(children);
            }
            self.delete(&id);
            removed.push(id);
        }
        removed
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &ResourceId) -> Option<&mut Resource> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.items.contains_key(id)
    }

    /// Children of `parent` in no particular order.
    pub fn children_of(
        &self,
        parent: &ResourceId,
    ) -> impl Iterator<Item = &ResourceId> + '_ {
        self.ownership.get(parent).into_iter().flatten()
    }

    pub fn has_children(&self, parent: &ResourceId) -> bool {
        self.ownership.get(parent).is_some_and(|c| !c.is_empty())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
