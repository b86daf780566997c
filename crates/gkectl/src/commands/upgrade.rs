//! Control plane and node pool upgrades

use crate::cli::{OutputFormat, UpgradeCommands};
use crate::commands::progress::spinner_callback;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::print_version;
use tracing::info;

pub async fn handle_upgrade(
    conn: &ConnectionManager,
    command: &UpgradeCommands,
    output: OutputFormat,
) -> CliResult<()> {
    let progress = matches!(output, OutputFormat::Text).then(spinner_callback);
    let mut controller = conn.controller(0, progress)?;
    controller.refresh().await?;

    let cluster = match command {
        UpgradeCommands::Master { version } => {
            let target = controller.latest_master_version_for_series(version).await?;
            info!(requested_version = %version, target_version = %target, "Resolved control plane target");
            controller.upgrade_control_plane(&target).await?
        }
        UpgradeCommands::Nodes { version } => {
            let target = controller.latest_node_version_for_series(version).await?;
            info!(requested_version = %version, target_version = %target, "Resolved node target");
            controller.upgrade_nodes(&target).await?
        }
    };

    let version = match command {
        UpgradeCommands::Master { .. } => cluster.current_master_version.as_str(),
        UpgradeCommands::Nodes { .. } => cluster
            .current_node_version
            .as_deref()
            .unwrap_or(cluster.current_master_version.as_str()),
    };
    print_version(version, output)
}
