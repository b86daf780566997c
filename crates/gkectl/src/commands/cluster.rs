//! Cluster lifecycle commands: create and status

use crate::cli::OutputFormat;
use crate::commands::progress::spinner_callback;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::{print_cluster, print_version};
use gkectl_core::ConfigError;
use tracing::info;

/// Create the cluster, or adopt it when it already exists, then print the
/// control-plane version
pub async fn handle_create(
    conn: &ConnectionManager,
    node_count: u32,
    output: OutputFormat,
) -> CliResult<()> {
    if node_count == 0 {
        return Err(ConfigError::InvalidValue {
            field: "node-count",
            message: "must specify node count greater than 0".to_string(),
        }
        .into());
    }

    let progress = matches!(output, OutputFormat::Text).then(spinner_callback);
    let mut controller = conn.controller(node_count, progress)?;
    let cluster = controller.create().await?;

    info!(
        cluster_name = %cluster.name,
        master_version = %cluster.current_master_version,
        "Cluster is ready"
    );
    print_version(&cluster.current_master_version, output)
}

/// Print the cluster's current snapshot
pub async fn handle_status(conn: &ConnectionManager, output: OutputFormat) -> CliResult<()> {
    let mut controller = conn.controller(0, None)?;
    let cluster = controller.refresh().await?;
    print_cluster(cluster, output)
}
