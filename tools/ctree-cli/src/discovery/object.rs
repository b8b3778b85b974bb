use ctree_status::{Condition, Resource, ResourceId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Label carrying the name of the cluster an object belongs to.
pub const CLUSTER_NAME_LABEL: &str = "cluster.x-k8s.io/cluster-name";
/// Label present on control plane machines.
pub const CONTROL_PLANE_LABEL: &str = "cluster.x-k8s.io/control-plane";

/// Unstructured Kubernetes object.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RawObject {
    #[serde(default)]
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Value,
    #[serde(default)]
    pub status: Value,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
    #[serde(default)]
    pub deletion_timestamp: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    #[serde(default)]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub controller: Option<bool>,
}

/// Reference to another object, as found in `spec.infrastructureRef` and
/// friends.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default)]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ObjectReference {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_version: String::new(),
            kind: kind.into(),
            name: name.into(),
            namespace: None,
        }
    }
}

impl RawObject {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    /// Object uid, or `kind/namespace/name` for objects saved without one.
    pub fn id(&self) -> ResourceId {
        match &self.metadata.uid {
            Some(uid) if !uid.is_empty() => ResourceId::object(uid.clone()),
            _ => ResourceId::object(format!(
                "{}/{}/{}",
                self.kind, self.metadata.namespace, self.metadata.name
            )),
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata.labels.get(key).map(String::as_str)
    }

    /// Reference stored at `pointer` under the object's `spec`, e.g.
    /// `/bootstrap/configRef`.
    pub fn spec_ref(&self, pointer: &str) -> Option<ObjectReference> {
        let value = self.spec.pointer(pointer)?;
        match serde_json::from_value(value.clone()) {
            Ok(r) => Some(r),
            Err(e) => {
                debug!(
                    kind = %self.kind,
                    name = %self.name(),
                    pointer,
                    error = %e,
                    "ignoring malformed reference"
                );
                None
            }
        }
    }

    pub fn controller(&self) -> Option<&OwnerReference> {
        self.metadata
            .owner_references
            .iter()
            .find(|o| o.controller.unwrap_or(false))
    }

    pub fn is_controlled_by(&self, owner: &RawObject) -> bool {
        let Some(c) = self.controller() else {
            return false;
        };
        match (&c.uid, &owner.metadata.uid) {
            (Some(a), Some(b)) => a == b,
            _ => c.kind == owner.kind && c.name == owner.metadata.name,
        }
    }

    /// Conditions under `status.conditions`; entries that do not parse are
    /// skipped.
    pub fn conditions(&self) -> Vec<Condition> {
        let Some(Value::Array(items)) = self.status.get("conditions") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                serde_json::from_value::<Condition>(item.clone())
                    .inspect_err(|e| {
                        debug!(
                            kind = %self.kind,
                            name = %self.name(),
                            error = %e,
                            "skipping malformed condition"
                        );
                    })
                    .ok()
            })
            .collect()
    }

    pub fn to_resource(&self) -> Resource {
        let mut r = Resource::new(
            self.id(),
            self.kind.clone(),
            self.metadata.name.clone(),
            self.metadata.namespace.clone(),
        )
        .with_conditions(self.conditions());
        r.deleting = self.metadata.deletion_timestamp.is_some();
        r
    }
}
