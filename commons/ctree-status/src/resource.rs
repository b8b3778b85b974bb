use crate::condition::{Condition, ConditionSeverity, ConditionStatus};
use std::fmt;

/// Identity of a node in the tree.
///
/// Group nodes get their own variant so a synthesized identity can never
/// collide with the identity of a discovered object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceId {
    /// Discovered object, usually keyed by its uid.
    Object(String),
    /// Structural placeholder such as "Workers".
    Virtual { namespace: String, name: String },
    /// Siblings under `parent` sharing the same readiness summary.
    Group { parent: Box<ResourceId>, key: GroupKey },
}

/// Readiness summary a group is keyed by; `None` groups objects without a
/// readiness condition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(Option<(ConditionStatus, ConditionSeverity, String)>);

impl GroupKey {
    pub fn of(ready: Option<&Condition>) -> Self {
        GroupKey(ready.map(|c| (c.status, c.severity, c.reason.clone())))
    }
}

impl ResourceId {
    pub fn object(uid: impl Into<String>) -> Self {
        ResourceId::Object(uid.into())
    }

    pub fn group(parent: &ResourceId, ready: Option<&Condition>) -> Self {
        ResourceId::Group {
            parent: Box::new(parent.clone()),
            key: GroupKey::of(ready),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Object(uid) => f.write_str(uid),
            ResourceId::Virtual { namespace, name } => {
                write!(f, "virtual:{namespace}/{name}")
            }
            ResourceId::Group { parent, key } => match &key.0 {
                Some((status, severity, reason)) => write!(
                    f,
                    "{parent}#group:{status}_{severity}_{reason}"
                ),
                None => write!(f, "{parent}#group:none"),
            },
        }
    }
}

/// An object placed in the status tree.
///
/// Engine-assigned presentation metadata lives in [`crate::meta::NodeMeta`],
/// not on the resource itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: String,
    pub name: String,
    pub namespace: String,
    /// Set when the object carries a deletion timestamp.
    pub deleting: bool,
    pub ready: Option<Condition>,
    /// Non-readiness conditions, in arbitrary order.
    pub conditions: Vec<Condition>,
}

impl Resource {
    pub fn new(
        id: ResourceId,
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
            deleting: false,
            ready: None,
            conditions: Vec::new(),
        }
    }

    /// Placeholder node with no backing object, e.g. the "Workers" bucket.
    pub fn virtual_object(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        Self::new(
            ResourceId::Virtual {
                namespace: namespace.clone(),
                name: name.clone(),
            },
            name.clone(),
            name,
            namespace,
        )
    }

    /// Splits a raw condition list into the readiness condition and the rest.
    pub fn with_conditions(
        mut self,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Self {
        for c in conditions {
            if c.is_ready_type() {
                self.ready = Some(c);
            } else {
                self.conditions.push(c);
            }
        }
        self
    }

    pub fn with_ready(mut self, ready: Condition) -> Self {
        self.ready = Some(ready);
        self
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.id, ResourceId::Virtual { .. })
    }

    pub fn is_group(&self) -> bool {
        matches!(self.id, ResourceId::Group { .. })
    }

    /// Non-readiness conditions sorted by type.
    pub fn other_conditions(&self) -> Vec<&Condition> {
        let mut out: Vec<&Condition> = self.conditions.iter().collect();
        out.sort_by(|a, b| a.type_.cmp(&b.type_));
        out
    }
}
