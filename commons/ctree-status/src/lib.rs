pub mod condition;
pub mod duration;
pub mod meta;
pub mod object_tree;
pub mod options;
pub mod render;
pub mod resource;
pub mod tree;

pub use condition::{
    Condition, ConditionSeverity, ConditionStatus, READY_CONDITION,
    ReadinessClass, classify, earliest_transition, equivalent,
};
pub use meta::{GroupMeta, NodeMeta};
pub use object_tree::{InsertOutcome, ObjectTree};
pub use options::{AddOptions, TreeOptions};
pub use render::{
    RenderOptions, RowLabel, TreePrefix, TreeRow, render, render_from,
};
pub use resource::{Resource, ResourceId};
pub use tree::ResourceTree;
