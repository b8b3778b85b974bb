//! Linearizes an [`ObjectTree`] into indented table rows.
//!
//! Rows carry plain data plus a [`ReadinessClass`]; colors and column layout
//! are left to the presentation layer.

use crate::condition::{Condition, ReadinessClass, classify};
use crate::duration::human_duration;
use crate::object_tree::ObjectTree;
use crate::resource::{Resource, ResourceId};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

pub const BRANCH: &str = "├─";
pub const LAST_BRANCH: &str = "└─";
pub const PIPE: &str = "│ ";
pub const INDENT: &str = "  ";

/// Messages longer than this are cut and suffixed with [`ELLIPSIS`].
pub const MAX_MESSAGE_LEN: usize = 100;
pub const ELLIPSIS: &str = " ...";

/// Blank columns between a node's connector column and its condition rows.
const CONDITION_FILLER: usize = 10;

/// Position of a node among its sorted siblings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connector {
    /// More siblings follow.
    Continuing,
    /// Last sibling.
    Last,
}

impl Connector {
    fn of(index: usize, len: usize) -> Self {
        if index + 1 == len {
            Connector::Last
        } else {
            Connector::Continuing
        }
    }

    fn branch(self) -> &'static str {
        match self {
            Connector::Continuing => BRANCH,
            Connector::Last => LAST_BRANCH,
        }
    }

    fn continuation(self) -> &'static str {
        match self {
            Connector::Continuing => PIPE,
            Connector::Last => INDENT,
        }
    }
}

/// Structural path from the root to a row.
///
/// Ancestor levels render as continuation glyphs, only the row's own level
/// renders as a branch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreePrefix {
    ancestors: Vec<Connector>,
    gap: usize,
    own: Option<Connector>,
}

impl TreePrefix {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, own: Connector) -> Self {
        Self {
            ancestors: self.levels(),
            gap: 0,
            own: Some(own),
        }
    }

    /// Prefix of a condition row attached to the node owning `self`.
    pub fn condition(&self, node_has_children: bool, own: Connector) -> Self {
        let mut ancestors = self.levels();
        ancestors.push(if node_has_children {
            Connector::Continuing
        } else {
            Connector::Last
        });
        Self {
            ancestors,
            gap: CONDITION_FILLER,
            own: Some(own),
        }
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len() + usize::from(self.own.is_some())
    }

    fn levels(&self) -> Vec<Connector> {
        self.ancestors.iter().copied().chain(self.own).collect()
    }

    pub fn render(&self) -> String {
        let mut out = self.ancestors.iter().fold(String::new(), |mut acc, c| {
            acc.push_str(c.continuation());
            acc
        });
        out.push_str(&" ".repeat(self.gap));
        if let Some(own) = self.own {
            out.push_str(own.branch());
        }
        out
    }
}

impl Serialize for TreePrefix {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// What the NAME column of a row shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowLabel {
    Object {
        kind: String,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta_name: Option<String>,
    },
    Group {
        label: String,
        members: Vec<String>,
    },
    Virtual {
        name: String,
    },
    Condition {
        condition_type: String,
    },
}

impl RowLabel {
    /// Uncolored text of the label; siblings are sorted by it.
    pub fn plain(&self) -> String {
        match self {
            RowLabel::Object {
                kind,
                name,
                meta_name: Some(meta),
            } => format!("{meta} - {kind}/{name}"),
            RowLabel::Object { kind, name, .. } => format!("{kind}/{name}"),
            RowLabel::Group { label, .. } => label.clone(),
            RowLabel::Virtual { name } => name.clone(),
            RowLabel::Condition { condition_type } => condition_type.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeRow {
    pub prefix: TreePrefix,
    pub label: RowLabel,
    pub deleted: bool,
    pub status: String,
    pub severity: String,
    pub reason: String,
    pub age: String,
    pub message: String,
    pub class: ReadinessClass,
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Reference time for ages.
    pub now: DateTime<Utc>,
    /// Show non-readiness conditions for every node.
    pub show_all_conditions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            show_all_conditions: false,
        }
    }
}

/// Renders every root of `tree`, roots ordered by display name.
pub fn render(tree: &ObjectTree, opts: &RenderOptions) -> Vec<TreeRow> {
    let mut roots: Vec<&Resource> = tree.roots().collect();
    sort_by_display_name(tree, &mut roots);
    let mut rows = Vec::new();
    for root in roots {
        render_node(tree, root, TreePrefix::root(), opts, &mut rows);
    }
    rows
}

/// Renders the subtree below `root`, or nothing if it is not in the tree.
pub fn render_from(
    tree: &ObjectTree,
    root: &ResourceId,
    opts: &RenderOptions,
) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    if let Some(obj) = tree.get(root) {
        render_node(tree, obj, TreePrefix::root(), opts, &mut rows);
    }
    rows
}

fn render_node(
    tree: &ObjectTree,
    obj: &Resource,
    prefix: TreePrefix,
    opts: &RenderOptions,
    rows: &mut Vec<TreeRow>,
) {
    let fields = ConditionFields::new(obj.ready.as_ref(), opts.now);
    let mut row = fields.into_row(prefix.clone(), label_of(tree, obj));
    row.deleted = obj.deleting;
    if let Some(group) = tree.group(&obj.id) {
        row.message = group.see_message();
    }
    rows.push(row);

    let mut children = tree.children_of(&obj.id);

    if opts.show_all_conditions || tree.is_show_conditions_object(&obj.id) {
        let has_children = !children.is_empty();
        let conditions = obj.other_conditions();
        let len = conditions.len();
        for (i, c) in conditions.into_iter().enumerate() {
            let p = prefix.condition(has_children, Connector::of(i, len));
            let label = RowLabel::Condition {
                condition_type: c.type_.clone(),
            };
            let fields = ConditionFields::new(Some(c), opts.now);
            rows.push(fields.into_row(p, label));
        }
    }

    sort_by_display_name(tree, &mut children);
    let len = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let p = prefix.child(Connector::of(i, len));
        render_node(tree, child, p, opts, rows);
    }
}

fn sort_by_display_name(tree: &ObjectTree, objs: &mut [&Resource]) {
    objs.sort_by_cached_key(|o| (display_name(tree, o), o.id.clone()));
}

/// Plain display name of a node, as shown in the NAME column.
pub fn display_name(tree: &ObjectTree, obj: &Resource) -> String {
    label_of(tree, obj).plain()
}

fn label_of(tree: &ObjectTree, obj: &Resource) -> RowLabel {
    if let Some(group) = tree.group(&obj.id) {
        return RowLabel::Group {
            label: group.label(),
            members: group.members().to_vec(),
        };
    }
    if obj.is_virtual() {
        return RowLabel::Virtual {
            name: obj.name.clone(),
        };
    }
    RowLabel::Object {
        kind: obj.kind.clone(),
        name: obj.name.clone(),
        meta_name: tree.meta_name(&obj.id).map(str::to_string),
    }
}

/// Cuts messages longer than [`MAX_MESSAGE_LEN`] characters.
pub fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &message[..cut]),
        None => message.to_string(),
    }
}

struct ConditionFields {
    status: String,
    severity: String,
    reason: String,
    age: String,
    message: String,
    class: ReadinessClass,
}

impl ConditionFields {
    fn new(c: Option<&Condition>, now: DateTime<Utc>) -> Self {
        let class = classify(c);
        let Some(c) = c else {
            return Self {
                status: String::new(),
                severity: String::new(),
                reason: String::new(),
                age: String::new(),
                message: String::new(),
                class,
            };
        };
        Self {
            status: c.status.to_string(),
            severity: c.severity.to_string(),
            reason: c.reason.clone(),
            age: c
                .last_transition_time
                .map(|t| human_duration(now - t))
                .unwrap_or_default(),
            message: truncate_message(&c.message),
            class,
        }
    }

    fn into_row(self, prefix: TreePrefix, label: RowLabel) -> TreeRow {
        TreeRow {
            prefix,
            label,
            deleted: false,
            status: self.status,
            severity: self.severity,
            reason: self.reason,
            age: self.age,
            message: self.message,
            class: self.class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionSeverity, ConditionStatus};
    use crate::options::{AddOptions, TreeOptions};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap()
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            now: now(),
            show_all_conditions: false,
        }
    }

    fn obj(kind: &str, name: &str) -> Resource {
        Resource::new(ResourceId::object(name), kind, name, "default")
    }

    fn names(rows: &[TreeRow]) -> Vec<String> {
        rows.iter()
            .map(|r| format!("{}{}", r.prefix.render(), r.label.plain()))
            .collect()
    }

    #[test]
    fn prefix_folds_ancestors_into_continuations() {
        let root = TreePrefix::root();
        assert_eq!(root.render(), "");
        let a = root.child(Connector::Continuing);
        assert_eq!(a.render(), "├─");
        let a_last = a.child(Connector::Last);
        assert_eq!(a_last.render(), "│ └─");
        let b = root.child(Connector::Last);
        let b_mid = b.child(Connector::Continuing);
        assert_eq!(b_mid.render(), "  ├─");
        assert_eq!(b_mid.child(Connector::Last).render(), "  │ └─");
        assert_eq!(b_mid.depth(), 2);
    }

    #[test]
    fn condition_prefix_leaves_room_for_children() {
        let node = TreePrefix::root().child(Connector::Continuing);
        assert_eq!(
            node.condition(true, Connector::Continuing).render(),
            format!("│ │ {}├─", " ".repeat(10))
        );
        assert_eq!(
            node.condition(false, Connector::Last).render(),
            format!("│   {}└─", " ".repeat(10))
        );
    }

    #[test]
    fn renders_sorted_tree_with_connectors() {
        let mut tree = ObjectTree::new(TreeOptions::default());
        let cluster = obj("Cluster", "c1");
        let cid = cluster.id.clone();
        tree.add(None, cluster, AddOptions::default());
        tree.add(Some(&cid), obj("Machine", "m2"), AddOptions::default());
        let m1 = obj("Machine", "m1");
        let m1_id = m1.id.clone();
        tree.add(Some(&cid), m1, AddOptions::default());
        tree.add(
            Some(&m1_id),
            obj("DockerMachine", "dm1"),
            AddOptions::default().meta_name("MachineInfrastructure"),
        );
        let workers = Resource::virtual_object("default", "Workers");
        tree.add(Some(&cid), workers, AddOptions::default());

        let rows = render(&tree, &opts());
        assert_eq!(
            names(&rows),
            vec![
                "Cluster/c1",
                "├─Machine/m1",
                "│ └─MachineInfrastructure - DockerMachine/dm1",
                "├─Machine/m2",
                "└─Workers",
            ]
        );
    }

    #[test]
    fn row_fields_come_from_readiness() {
        let mut tree = ObjectTree::new(TreeOptions::default());
        let mut c = obj("Cluster", "c1");
        c.deleting = true;
        c.ready = Some(
            Condition::ready_false("Crashed", ConditionSeverity::Error, "boom")
                .with_transition(now() - chrono::TimeDelta::minutes(5)),
        );
        tree.add(None, c, AddOptions::default());
        tree.add(None, obj("Cluster", "c2"), AddOptions::default());

        let rows = render(&tree, &opts());
        let r = &rows[0];
        assert!(r.deleted);
        assert_eq!(r.status, "False");
        assert_eq!(r.severity, "Error");
        assert_eq!(r.reason, "Crashed");
        assert_eq!(r.age, "5m");
        assert_eq!(r.message, "boom");
        assert_eq!(r.class, ReadinessClass::Error);

        let bare = &rows[1];
        assert_eq!(bare.status, "");
        assert_eq!(bare.age, "");
        assert_eq!(bare.class, ReadinessClass::Unknown);
    }

    #[test]
    fn group_rows_point_at_members() {
        let mut tree = ObjectTree::new(TreeOptions::default());
        let cp = obj("KubeadmControlPlane", "cp");
        let cp_id = cp.id.clone();
        tree.add(None, cp, AddOptions::default().grouping_object(true));
        for name in ["m3", "m1", "m2"] {
            let m = obj("Machine", name).with_ready(Condition::ready_true());
            tree.add(Some(&cp_id), m, AddOptions::default());
        }
        let rows = render(&tree, &opts());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].label.plain(), "3 Machines...");
        assert_eq!(rows[1].message, "See m1, m2, ...");
        assert_eq!(rows[1].class, ReadinessClass::Ok);
        assert_eq!(rows[1].prefix.render(), "└─");
    }

    #[test]
    fn shows_other_conditions_sorted_before_children() {
        let options = TreeOptions {
            show_other_conditions: "Cluster".into(),
            ..Default::default()
        };
        let mut tree = ObjectTree::new(options);
        let c = obj("Cluster", "c1").with_conditions([
            Condition::ready_true(),
            Condition::new("InfrastructureReady", ConditionStatus::True),
            Condition {
                type_: "ControlPlaneReady".into(),
                ..Condition::ready_false("Waiting", ConditionSeverity::Info, "")
            },
        ]);
        let cid = c.id.clone();
        tree.add(None, c, AddOptions::default());
        tree.add(Some(&cid), obj("Machine", "m1"), AddOptions::default());

        let rows = render(&tree, &opts());
        let filler = " ".repeat(10);
        assert_eq!(
            names(&rows),
            vec![
                "Cluster/c1".to_string(),
                format!("│ {filler}├─ControlPlaneReady"),
                format!("│ {filler}└─InfrastructureReady"),
                "└─Machine/m1".to_string(),
            ]
        );
        assert_eq!(rows[1].class, ReadinessClass::Neutral);
        assert_eq!(rows[2].class, ReadinessClass::Ok);
    }

    #[test]
    fn forced_conditions_apply_to_every_node() {
        let mut tree = ObjectTree::new(TreeOptions::default());
        let c = obj("Cluster", "c1")
            .with_conditions([Condition::new("A", ConditionStatus::True)]);
        tree.add(None, c, AddOptions::default());
        let rows = render(
            &tree,
            &RenderOptions {
                show_all_conditions: true,
                ..opts()
            },
        );
        assert_eq!(rows.len(), 2);
        let filler = " ".repeat(10);
        assert_eq!(rows[1].prefix.render(), format!("  {filler}└─"));
    }

    #[test]
    fn truncates_long_messages() {
        let long = "x".repeat(150);
        let got = truncate_message(&long);
        assert_eq!(got, format!("{}{ELLIPSIS}", "x".repeat(100)));
        let exact = "y".repeat(100);
        assert_eq!(truncate_message(&exact), exact);
        let wide = "é".repeat(101);
        let expected = format!("{}{ELLIPSIS}", "é".repeat(100));
        assert_eq!(truncate_message(&wide), expected);
    }

    #[test]
    fn render_from_unknown_root_is_empty() {
        let tree = ObjectTree::new(TreeOptions::default());
        let rows = render_from(&tree, &ResourceId::object("x"), &opts());
        assert!(rows.is_empty());
    }
}
