mod config;
mod discovery;
mod output;
mod types;

use envconfig::Envconfig;
use std::process;
use tracing::debug;

pub use config::{RunConfig, TreeEnvConfig};
pub use discovery::{
    DiscoveryError, ObjectReference, ObjectSource, RawObject, SnapshotSource,
    discover,
};
pub use output::{Formatter, get_formatter, print_output};
pub use types::{CtreeCli, OutputFormat, TreeArgs};

use ctree_status::{RenderOptions, render_from};

pub async fn run(cli: CtreeCli) {
    if let Err(e) = show_tree(&cli).await {
        eprintln!("ctree failed: {}", e);
        process::exit(1);
    }
}

/// Reads the snapshot, builds the cluster tree and prints it.
pub async fn show_tree(cli: &CtreeCli) -> anyhow::Result<()> {
    let env = TreeEnvConfig::init_from_env()
        .map_err(|e| anyhow::anyhow!("invalid CTREE_* environment: {e}"))?;
    let run = RunConfig::resolve(cli, env);
    debug!(?run, "resolved configuration");

    let content = cli
        .file
        .clone()
        .contents()
        .map_err(|e| DiscoveryError::read_failed(e.to_string()))?;
    let source = SnapshotSource::parse(&content)?;

    let (tree, root) =
        discover(&source, &cli.cluster, &run.namespace, run.tree.clone())
            .await?;

    let rows = render_from(
        &tree,
        &root,
        &RenderOptions {
            show_all_conditions: run.show_all_conditions,
            ..Default::default()
        },
    );
    print_output(&rows, &cli.output, run.color)
}
