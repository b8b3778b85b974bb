use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use ctree_status::{
    AddOptions, Condition, ConditionSeverity, ObjectTree, ReadinessClass,
    RenderOptions, Resource, ResourceId, RowLabel, TreeOptions, render,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

fn render_opts() -> RenderOptions {
    RenderOptions {
        now: now(),
        show_all_conditions: false,
    }
}

fn machine(name: &str, ready: Option<Condition>) -> Resource {
    let mut m = Resource::new(
        ResourceId::object(format!("uid-{name}")),
        "Machine",
        name,
        "default",
    );
    m.ready = ready;
    m
}

fn object(uid: &str, kind: &str, name: &str) -> Resource {
    Resource::new(ResourceId::object(uid), kind, name, "default")
}

fn crashed(minutes_ago: i64) -> Condition {
    let message = "container exited";
    Condition::ready_false("Crashed", ConditionSeverity::Error, message)
        .with_transition(now() - TimeDelta::minutes(minutes_ago))
}

fn grouping_root(tree: &mut ObjectTree) -> ResourceId {
    let root = object("uid-r", "Cluster", "R");
    let id = root.id.clone();
    tree.add(None, root, AddOptions::default().grouping_object(true));
    id
}

#[test]
fn equivalent_children_of_a_grouping_root_become_one_group() {
    let mut tree = ObjectTree::new(TreeOptions::default());
    let root = grouping_root(&mut tree);
    for (name, minutes_ago) in [("A", 30), ("B", 90)] {
        let m = machine(name, Some(crashed(minutes_ago)));
        tree.add(Some(&root), m, AddOptions::default());
    }

    let children = tree.children_of(&root);
    assert_eq!(children.len(), 1);
    let group = children[0];
    assert!(tree.is_group_object(&group.id));
    assert_eq!(tree.group(&group.id).unwrap().members(), ["A", "B"]);

    let rows = render(&tree, &render_opts());
    assert_eq!(rows.len(), 2);
    let row = &rows[1];
    assert_eq!(row.class, ReadinessClass::Error);
    assert_eq!(row.reason, "Crashed");
    assert_eq!(row.age, "90m");
    assert_eq!(group.ready.as_ref().unwrap().message, "");
    assert_eq!(row.message, "See A, B");
}

#[test]
fn three_way_group_keeps_the_earliest_transition() {
    let mut tree = ObjectTree::new(TreeOptions::default());
    let root = grouping_root(&mut tree);
    let warn = |minutes_ago| {
        Condition::ready_false("X", ConditionSeverity::Warning, "m")
            .with_transition(now() - TimeDelta::minutes(minutes_ago))
    };
    tree.add(Some(&root), machine("m1", Some(warn(5))), AddOptions::default());
    tree.add(Some(&root), machine("m2", Some(warn(50))), AddOptions::default());
    tree.add(Some(&root), machine("m3", Some(warn(20))), AddOptions::default());

    let children = tree.children_of(&root);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.group(&children[0].id).unwrap().members().len(), 3);
    assert_eq!(
        children[0].ready.as_ref().unwrap().last_transition_time,
        Some(now() - TimeDelta::minutes(50))
    );
}

#[test]
fn echo_children_never_appear() {
    let mut tree = ObjectTree::new(TreeOptions::default());
    let root = grouping_root(&mut tree);
    let parent = machine("m1", Some(crashed(1)));
    let parent_id = parent.id.clone();
    tree.add(Some(&root), parent, AddOptions::default());

    let infra = object("infra", "DockerMachine", "infra")
        .with_ready(Condition::ready_true());
    tree.add(
        Some(&parent_id),
        infra,
        AddOptions::default()
            .no_echo(true)
            .grouping_object(true)
            .meta_name("MachineInfrastructure"),
    );
    assert!(tree.children_of(&parent_id).is_empty());

    let kept = object("boot", "KubeadmConfig", "boot")
        .with_ready(Condition::ready_true());
    tree.add(Some(&parent_id), kept, AddOptions::default());
    assert_eq!(tree.children_of(&parent_id).len(), 1);
}

#[test]
fn output_order_does_not_depend_on_insertion_order() {
    let warn = || Condition::ready_false("X", ConditionSeverity::Warning, "");
    let orders = [["B", "A", "C"], ["C", "B", "A"], ["A", "C", "B"]];
    let mut outputs = Vec::new();
    for order in orders {
        let mut tree = ObjectTree::new(TreeOptions::default());
        let root = grouping_root(&mut tree);
        for name in order {
            let ready = if name == "A" { None } else { Some(warn()) };
            tree.add(Some(&root), machine(name, ready), AddOptions::default());
        }
        let rows = render(&tree, &render_opts());
        let labels: Vec<String> = rows
            .iter()
            .map(|r| format!("{}{}", r.prefix.render(), r.label.plain()))
            .collect();
        outputs.push(labels);
    }
    assert_eq!(
        outputs[0],
        vec!["Cluster/R", "├─2 Machines...", "└─Machine/A"]
    );
    assert!(outputs.iter().all(|o| o == &outputs[0]));
}

#[test]
fn deep_trees_keep_ancestor_continuations() {
    let mut tree = ObjectTree::new(TreeOptions::default());
    let cluster = object("c", "Cluster", "c");
    let cid = cluster.id.clone();
    tree.add(None, cluster, AddOptions::default());
    let workers = Resource::virtual_object("default", "Workers");
    let wid = workers.id.clone();
    tree.add(Some(&cid), workers, AddOptions::default());
    let cp = object("cp", "KubeadmControlPlane", "cp");
    let cpid = cp.id.clone();
    let control_plane = AddOptions::default().meta_name("ControlPlane");
    tree.add(Some(&cid), cp, control_plane);
    tree.add(Some(&cpid), machine("cp-0", None), AddOptions::default());
    let md = object("md", "MachineDeployment", "md");
    let mdid = md.id.clone();
    tree.add(Some(&wid), md, AddOptions::default());
    let w0 = machine("w-0", None);
    let w0id = w0.id.clone();
    tree.add(Some(&mdid), w0, AddOptions::default());
    tree.add(Some(&mdid), machine("w-1", None), AddOptions::default());
    let provisioning =
        Condition::ready_false("Provisioning", ConditionSeverity::Info, "");
    tree.add(
        Some(&w0id),
        object("dm", "DockerMachine", "w-0").with_ready(provisioning),
        AddOptions::default()
            .meta_name("MachineInfrastructure")
            .no_echo(true),
    );

    let rows = render(&tree, &render_opts());
    let lines: Vec<String> = rows
        .iter()
        .map(|r| format!("{}{}", r.prefix.render(), r.label.plain()))
        .collect();
    assert_eq!(
        lines,
        vec![
            "Cluster/c",
            "├─ControlPlane - KubeadmControlPlane/cp",
            "│ └─Machine/cp-0",
            "└─Workers",
            "  └─MachineDeployment/md",
            "    ├─Machine/w-0",
            "    │ └─MachineInfrastructure - DockerMachine/w-0",
            "    └─Machine/w-1",
        ]
    );
    assert!(matches!(rows[3].label, RowLabel::Virtual { .. }));
}
