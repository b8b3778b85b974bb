/// Separator used when listing group members.
pub const GROUP_ITEMS_SEPARATOR: &str = ", ";

/// Engine-assigned metadata for a node, read back by the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeMeta {
    /// Name shown in front of `Kind/Name`, e.g. "ControlPlane".
    pub meta_name: Option<String>,
    /// Children of this node are grouped when their readiness is equivalent.
    pub grouping_parent: bool,
    /// Render every non-readiness condition of this node.
    pub show_conditions: bool,
    /// Present only on synthesized group nodes.
    pub group: Option<GroupMeta>,
}

/// Membership of a group node.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupMeta {
    kind: String,
    members: Vec<String>,
}

impl GroupMeta {
    pub fn new(kind: impl Into<String>, first: String, second: String) -> Self {
        let mut members = vec![first, second];
        members.sort();
        Self {
            kind: kind.into(),
            members,
        }
    }

    pub fn add(&mut self, name: String) {
        self.members.push(name);
        self.members.sort();
    }

    /// Member names in lexicographic order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn items(&self) -> String {
        self.members.join(GROUP_ITEMS_SEPARATOR)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Count style label, e.g. "3 Machines...".
    pub fn label(&self) -> String {
        format!("{} {}s...", self.members.len(), self.kind)
    }

    /// Pointer to the first members, e.g. "See m1, m2, ...".
    pub fn see_message(&self) -> String {
        if self.members.len() <= 2 {
            format!("See {}", self.items())
        } else {
            format!(
                "See {}, ...",
                self.members[..2].join(GROUP_ITEMS_SEPARATOR)
            )
        }
    }
}
