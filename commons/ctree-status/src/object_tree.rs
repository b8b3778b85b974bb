use crate::condition::{ConditionStatus, earliest_transition, equivalent};
use crate::meta::{GroupMeta, NodeMeta};
use crate::options::{AddOptions, TreeOptions, matches_condition_filter};
use crate::resource::{Resource, ResourceId};
use crate::tree::ResourceTree;
use std::collections::HashMap;
use tracing::{debug, trace};

/// What happened to an object handed to [`ObjectTree::add`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Added as a plain node.
    Inserted,
    /// Hidden because it echoes its parent's readiness.
    Suppressed,
    /// Absorbed into an existing group node.
    Merged(ResourceId),
    /// Merged with an equivalent sibling into a new group node.
    Grouped(ResourceId),
    /// The parent is not in the tree (suppressed or absorbed), so the
    /// object was dropped.
    Detached,
    /// The object is already in the tree; it keeps its first position.
    Duplicate,
}

/// Status tree under construction.
///
/// Objects must be added parents first and one at a time: whether a parent
/// groups its children is decided when the parent is added, and grouping
/// inspects the siblings already present.
#[derive(Debug, Default)]
pub struct ObjectTree {
    options: TreeOptions,
    tree: ResourceTree,
    meta: HashMap<ResourceId, NodeMeta>,
    roots: Vec<ResourceId>,
}

impl ObjectTree {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Adds `obj` under `parent`, or as a root when `parent` is `None`.
    pub fn add(
        &mut self,
        parent: Option<&ResourceId>,
        obj: Resource,
        opts: AddOptions,
    ) -> InsertOutcome {
        let parent_ready = match parent {
            Some(p) => match self.tree.get(p) {
                Some(p) => p.ready.clone(),
                None => {
                    debug!(
                        parent = %p,
                        obj = %obj.id,
                        "parent not in tree, dropping object"
                    );
                    return InsertOutcome::Detached;
                }
            },
            None => None,
        };

        // covers self-parenting and cycles too: the parent and its
        // ancestors are all in the tree already
        if self.tree.contains(&obj.id) {
            debug!(obj = %obj.id, "object already in tree, dropping duplicate");
            return InsertOutcome::Duplicate;
        }

        let mut meta = NodeMeta::default();
        if matches_condition_filter(
            &self.options.show_other_conditions,
            &obj.kind,
            &obj.name,
        ) {
            trace!(kind = %obj.kind, name = %obj.name, "showing conditions");
            meta.show_conditions = true;
        }

        if opts.no_echo && !self.options.disable_no_echo {
            let is_true = obj
                .ready
                .as_ref()
                .is_some_and(|c| c.status == ConditionStatus::True);
            if is_true || equivalent(parent_ready.as_ref(), obj.ready.as_ref())
            {
                debug!(kind = %obj.kind, name = %obj.name, "hiding echo");
                return InsertOutcome::Suppressed;
            }
        }

        if let Some(name) = opts.meta_name.filter(|n| !n.is_empty()) {
            meta.meta_name = Some(name);
        }

        if let Some(parent) = parent {
            if self.is_grouping_object(parent) {
                if let Some(outcome) = self.try_group(parent, &obj) {
                    return outcome;
                }
            }
        }

        if opts.grouping_object && !self.options.disable_grouping {
            meta.grouping_parent = true;
        }

        debug!(kind = %obj.kind, name = %obj.name, "adding object");
        self.insert_node(parent, obj, meta);
        InsertOutcome::Inserted
    }

    /// Merges `obj` with the first sibling whose readiness is equivalent,
    /// if any.
    fn try_group(
        &mut self,
        parent: &ResourceId,
        obj: &Resource,
    ) -> Option<InsertOutcome> {
        let sibling_id = self
            .tree
            .children_of(parent)
            .find(|s| {
                let s_ready = self.tree.get(s).and_then(|s| s.ready.as_ref());
                equivalent(obj.ready.as_ref(), s_ready)
            })?
            .clone();

        if self.is_group_object(&sibling_id) {
            if let Some(group) =
                self.meta.get_mut(&sibling_id).and_then(|m| m.group.as_mut())
            {
                group.add(obj.name.clone());
            }
            if let Some(ready) = self
                .tree
                .get_mut(&sibling_id)
                .and_then(|g| g.ready.as_mut())
            {
                ready.last_transition_time =
                    earliest_transition(obj.ready.as_ref(), Some(&*ready));
                ready.message.clear();
            }
            debug!(
                group = %sibling_id,
                name = %obj.name,
                "merged into existing group"
            );
            return Some(InsertOutcome::Merged(sibling_id));
        }

        let sibling = self.tree.get(&sibling_id)?.clone();
        let group_id = ResourceId::group(parent, obj.ready.as_ref());
        let mut group = Resource::new(
            group_id.clone(),
            obj.kind.clone(),
            group_id.to_string(),
            obj.namespace.clone(),
        );
        group.ready = obj.ready.clone().map(|mut ready| {
            ready.last_transition_time =
                earliest_transition(Some(&ready), sibling.ready.as_ref());
            ready.message.clear();
            ready
        });
        let meta = NodeMeta {
            group: Some(GroupMeta::new(
                obj.kind.clone(),
                obj.name.clone(),
                sibling.name.clone(),
            )),
            ..Default::default()
        };

        self.insert_node(Some(parent), group, meta);
        for removed in self.tree.purge(parent, &sibling_id) {
            self.meta.remove(&removed);
        }
        debug!(
            group = %group_id,
            a = %sibling.name,
            b = %obj.name,
            "grouped siblings"
        );
        Some(InsertOutcome::Grouped(group_id))
    }

    fn insert_node(
        &mut self,
        parent: Option<&ResourceId>,
        obj: Resource,
        meta: NodeMeta,
    ) {
        let id = obj.id.clone();
        match parent {
            Some(parent) => {
                self.tree.link(parent, &id);
            }
            None => {
                if !self.roots.contains(&id) {
                    self.roots.push(id.clone());
                }
            }
        }
        if meta == NodeMeta::default() {
            self.meta.remove(&id);
        } else {
            self.meta.insert(id, meta);
        }
        self.tree.put(obj);
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.tree.get(id)
    }

    /// Children of `parent`, unordered.
    pub fn children_of(&self, parent: &ResourceId) -> Vec<&Resource> {
        self.tree
            .children_of(parent)
            .filter_map(|id| self.tree.get(id))
            .collect()
    }

    pub fn has_children(&self, parent: &ResourceId) -> bool {
        self.tree.has_children(parent)
    }

    /// Roots in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Resource> + '_ {
        self.roots.iter().filter_map(|id| self.tree.get(id))
    }

    pub fn meta(&self, id: &ResourceId) -> Option<&NodeMeta> {
        self.meta.get(id)
    }

    pub fn is_grouping_object(&self, id: &ResourceId) -> bool {
        self.meta.get(id).is_some_and(|m| m.grouping_parent)
    }

    pub fn is_group_object(&self, id: &ResourceId) -> bool {
        self.meta.get(id).is_some_and(|m| m.group.is_some())
    }

    pub fn is_show_conditions_object(&self, id: &ResourceId) -> bool {
        self.meta.get(id).is_some_and(|m| m.show_conditions)
    }

    pub fn meta_name(&self, id: &ResourceId) -> Option<&str> {
        self.meta.get(id).and_then(|m| m.meta_name.as_deref())
    }

    pub fn group(&self, id: &ResourceId) -> Option<&GroupMeta> {
        self.meta.get(id).and_then(|m| m.group.as_ref())
    }

    /// Number of nodes, group nodes included.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
