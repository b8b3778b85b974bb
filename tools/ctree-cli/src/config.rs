use crate::types::{CtreeCli, TreeArgs};
use ctree_status::TreeOptions;
use envconfig::Envconfig;

/// Defaults taken from the environment; command line flags win.
#[derive(Envconfig, Clone, Debug)]
pub struct TreeEnvConfig {
    #[envconfig(from = "CTREE_NAMESPACE", default = "default")]
    pub namespace: String,

    /// Env: CTREE_SHOW_ALL_CONDITIONS
    #[envconfig(from = "CTREE_SHOW_ALL_CONDITIONS")]
    pub show_all_conditions: Option<String>,

    #[envconfig(from = "CTREE_DISABLE_NO_ECHO", default = "false")]
    pub disable_no_echo: bool,

    #[envconfig(from = "CTREE_DISABLE_GROUPING", default = "false")]
    pub disable_grouping: bool,

    #[envconfig(from = "CTREE_NO_COLOR", default = "false")]
    pub no_color: bool,
}

/// Settings for one run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub namespace: String,
    pub tree: TreeOptions,
    /// Expand conditions on every row, including group and virtual nodes.
    pub show_all_conditions: bool,
    pub color: bool,
}

impl TreeArgs {
    pub fn to_tree_options(&self, env: &TreeEnvConfig) -> TreeOptions {
        TreeOptions {
            show_other_conditions: self
                .show_all_conditions
                .clone()
                .or_else(|| env.show_all_conditions.clone())
                .unwrap_or_default(),
            disable_no_echo: self.disable_no_echo || env.disable_no_echo,
            disable_grouping: self.disable_grouping || env.disable_grouping,
        }
    }
}

impl RunConfig {
    pub fn resolve(cli: &CtreeCli, env: TreeEnvConfig) -> Self {
        let tree = cli.tree.to_tree_options(&env);
        let show_all_conditions = tree
            .show_other_conditions
            .split(',')
            .any(|f| f.trim().eq_ignore_ascii_case("all"));
        Self {
            namespace: cli.namespace.clone().unwrap_or(env.namespace),
            tree,
            show_all_conditions,
            color: !(cli.no_color || env.no_color),
        }
    }
}
