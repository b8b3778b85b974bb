mod error;
mod object;
mod snapshot;

pub use error::DiscoveryError;
pub use object::{
    CLUSTER_NAME_LABEL, CONTROL_PLANE_LABEL, ObjectMeta, ObjectReference,
    OwnerReference, RawObject,
};
pub use snapshot::SnapshotSource;

use async_trait::async_trait;
use ctree_status::{AddOptions, ObjectTree, Resource, ResourceId, TreeOptions};
use std::collections::HashSet;
use tracing::{debug, info};

/// Where cluster objects come from.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Fetches the object a reference points to. References without a
    /// namespace resolve in `namespace`.
    async fn get(
        &self,
        namespace: &str,
        reference: &ObjectReference,
    ) -> Result<Option<RawObject>, DiscoveryError>;

    /// Lists objects of `kind` in `namespace` labelled as part of
    /// `cluster_name`.
    async fn list(
        &self,
        kind: &str,
        namespace: &str,
        cluster_name: &str,
    ) -> Result<Vec<RawObject>, DiscoveryError>;
}

/// Builds the status tree of a Cluster API cluster.
///
/// Returns the tree together with the identity of the Cluster node.
pub async fn discover(
    source: &dyn ObjectSource,
    cluster_name: &str,
    namespace: &str,
    options: TreeOptions,
) -> Result<(ObjectTree, ResourceId), DiscoveryError> {
    let cluster = source
        .get(namespace, &ObjectReference::new("Cluster", cluster_name))
        .await?
        .ok_or_else(|| {
            DiscoveryError::cluster_not_found(namespace, cluster_name)
        })?;
    let cluster_id = cluster.id();

    let mut objs = ObjectTree::new(options);
    objs.add(None, cluster.to_resource(), AddOptions::default());

    if let Some(infra) =
        fetch_ref(source, &cluster, "/infrastructureRef", namespace).await?
    {
        objs.add(
            Some(&cluster_id),
            infra.to_resource(),
            AddOptions::default().meta_name("ClusterInfrastructure"),
        );
    }

    let control_plane =
        fetch_ref(source, &cluster, "/controlPlaneRef", namespace).await?;
    let control_plane_id = control_plane.as_ref().map(RawObject::id);
    if let Some(cp) = &control_plane {
        objs.add(
            Some(&cluster_id),
            cp.to_resource(),
            AddOptions::default()
                .meta_name("ControlPlane")
                .grouping_object(true),
        );
    }

    let machines = source.list("Machine", namespace, cluster_name).await?;
    let mut added: HashSet<ResourceId> = HashSet::new();

    let (control_plane_machines, workers): (Vec<_>, Vec<_>) = machines
        .iter()
        .partition(|m| m.label(CONTROL_PLANE_LABEL).is_some());

    for m in &control_plane_machines {
        match &control_plane_id {
            Some(cp) => add_machine(source, &mut objs, cp, m, namespace).await?,
            None => {
                debug!(
                    machine = %m.name(),
                    "no control plane object, dropping machine"
                )
            }
        }
        added.insert(m.id());
    }

    if !workers.is_empty() {
        let workers_node = Resource::virtual_object(namespace, "Workers");
        let workers_id = workers_node.id.clone();
        objs.add(Some(&cluster_id), workers_node, AddOptions::default());

        let deployments = source
            .list("MachineDeployment", namespace, cluster_name)
            .await?;
        let machine_sets =
            source.list("MachineSet", namespace, cluster_name).await?;

        for md in &deployments {
            let md_id = md.id();
            objs.add(
                Some(&workers_id),
                md.to_resource(),
                AddOptions::default().grouping_object(true),
            );
            for ms in machine_sets.iter().filter(|ms| ms.is_controlled_by(md)) {
                for m in workers.iter().filter(|m| m.is_controlled_by(ms)) {
                    add_machine(source, &mut objs, &md_id, m, namespace).await?;
                    added.insert(m.id());
                }
            }
        }

        let others: Vec<_> =
            workers.iter().filter(|m| !added.contains(&m.id())).collect();
        if !others.is_empty() {
            let other_node = Resource::virtual_object(namespace, "Other");
            let other_id = other_node.id.clone();
            objs.add(Some(&workers_id), other_node, AddOptions::default());
            for m in others {
                add_machine(source, &mut objs, &other_id, m, namespace).await?;
            }
        }

        info!(
            machine_deployments = deployments.len(),
            machine_sets = machine_sets.len(),
            "discovered worker objects"
        );
    }

    info!(
        cluster = %cluster_name,
        namespace = %namespace,
        machines = machines.len(),
        control_plane_machines = control_plane_machines.len(),
        nodes = objs.len(),
        "discovered cluster"
    );
    Ok((objs, cluster_id))
}

async fn add_machine(
    source: &dyn ObjectSource,
    objs: &mut ObjectTree,
    parent: &ResourceId,
    machine: &RawObject,
    namespace: &str,
) -> Result<(), DiscoveryError> {
    let machine_id = machine.id();
    objs.add(Some(parent), machine.to_resource(), AddOptions::default());

    if let Some(infra) =
        fetch_ref(source, machine, "/infrastructureRef", namespace).await?
    {
        objs.add(
            Some(&machine_id),
            infra.to_resource(),
            AddOptions::default()
                .meta_name("MachineInfrastructure")
                .no_echo(true),
        );
    }
    if let Some(config) =
        fetch_ref(source, machine, "/bootstrap/configRef", namespace).await?
    {
        objs.add(
            Some(&machine_id),
            config.to_resource(),
            AddOptions::default().meta_name("BootstrapConfig").no_echo(true),
        );
    }
    Ok(())
}

/// Resolves the reference at `pointer` in `owner`'s spec. Missing references
/// and missing targets are not errors: objects being deleted often have
/// neither.
async fn fetch_ref(
    source: &dyn ObjectSource,
    owner: &RawObject,
    pointer: &str,
    namespace: &str,
) -> Result<Option<RawObject>, DiscoveryError> {
    let Some(reference) = owner.spec_ref(pointer) else {
        return Ok(None);
    };
    let found = source.get(namespace, &reference).await?;
    if found.is_none() {
        debug!(
            owner = %owner.name(),
            kind = %reference.kind,
            name = %reference.name,
            "referenced object not found"
        );
    }
    Ok(found)
}
