use super::error::DiscoveryError;
use super::object::{CLUSTER_NAME_LABEL, ObjectReference, RawObject};
use super::ObjectSource;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Objects loaded from a saved `kubectl get -o yaml|json` dump.
#[derive(Debug, Default, Clone)]
pub struct SnapshotSource {
    objects: Vec<RawObject>,
}

impl SnapshotSource {
    pub fn new(objects: Vec<RawObject>) -> Self {
        Self { objects }
    }

    /// Parses a YAML or JSON snapshot. Accepts multi-document streams,
    /// `List` objects and bare sequences of objects.
    pub fn parse(content: &str) -> Result<Self, DiscoveryError> {
        let mut objects = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(doc)?;
            collect_objects(value, &mut objects)?;
        }
        debug!(count = objects.len(), "loaded snapshot");
        Ok(Self { objects })
    }

    pub fn objects(&self) -> &[RawObject] {
        &self.objects
    }
}

fn collect_objects(
    value: Value,
    out: &mut Vec<RawObject>,
) -> Result<(), DiscoveryError> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                collect_objects(item, out)?;
            }
            Ok(())
        }
        Value::Object(mut map) => {
            let is_list = map
                .get("kind")
                .and_then(Value::as_str)
                .is_some_and(|k| k == "List" || k.ends_with("List"))
                && map.get("items").is_some_and(Value::is_array);
            if is_list {
                if let Some(items) = map.remove("items") {
                    collect_objects(items, out)?;
                }
                return Ok(());
            }
            out.push(serde_json::from_value(Value::Object(map))?);
            Ok(())
        }
        other => Err(DiscoveryError::read_failed(format!(
            "expected an object, found {other}"
        ))),
    }
}

#[async_trait]
impl ObjectSource for SnapshotSource {
    async fn get(
        &self,
        namespace: &str,
        reference: &ObjectReference,
    ) -> Result<Option<RawObject>, DiscoveryError> {
        let namespace = reference.namespace.as_deref().unwrap_or(namespace);
        Ok(self
            .objects
            .iter()
            .find(|o| {
                o.kind == reference.kind
                    && o.name() == reference.name
                    && o.namespace() == namespace
            })
            .cloned())
    }

    async fn list(
        &self,
        kind: &str,
        namespace: &str,
        cluster_name: &str,
    ) -> Result<Vec<RawObject>, DiscoveryError> {
        Ok(self
            .objects
            .iter()
            .filter(|o| {
                o.kind == kind
                    && o.namespace() == namespace
                    && o.label(CLUSTER_NAME_LABEL) == Some(cluster_name)
            })
            .cloned()
            .collect())
    }
}
