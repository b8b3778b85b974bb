use chrono::DateTime;
use clap_stdin::FileOrStdin;

/// Get version information including build time - using Box::leak to get a
/// static str
fn get_version_info() -> &'static str {
    let version = env!("CARGO_PKG_VERSION");
    let build_timestamp_str = env!("BUILD_TIMESTAMP");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");

    let build_time = build_timestamp_str
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Box::leak(
        format!("{} (built {}, git {})", version, build_time, git_hash)
            .into_boxed_str(),
    )
}

/// Show the status of a Cluster API cluster as a tree
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version = get_version_info(), about, long_about = None)]
pub struct CtreeCli {
    /// Name of the Cluster object to show
    pub cluster: String,

    /// Snapshot of the cluster objects (YAML or JSON, `-` reads stdin)
    #[arg(short, long, default_value = "-")]
    pub file: FileOrStdin,

    /// Namespace of the Cluster (defaults to CTREE_NAMESPACE or "default")
    #[arg(short, long)]
    pub namespace: Option<String>,

    #[clap(flatten)]
    pub tree: TreeArgs,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

/// Switches shaping the tree
#[derive(clap::Args, Clone, Debug, Default)]
pub struct TreeArgs {
    /// Comma separated kind or kind/name for which all the object's
    /// conditions are shown (`all` shows conditions for every object)
    #[arg(long)]
    pub show_all_conditions: Option<String>,

    /// Show MachineInfrastructure and BootstrapConfig objects even when ready
    /// or when they restate the Machine's ready condition
    #[arg(long, default_value_t = false)]
    pub disable_no_echo: bool,

    /// Do not group machines whose ready condition has the same status,
    /// severity and reason
    #[arg(long, default_value_t = false)]
    pub disable_grouping: bool,
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
