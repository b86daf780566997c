//! Version resolution commands

use crate::cli::{OutputFormat, VersionArgs};
use crate::connection::ConnectionManager;
use crate::error::{CliDiagnostic, Result as CliResult};
use crate::output::{print_resolved_version, print_version};
use tracing::debug;

/// Resolve a master (default) or node version for a release series, then
/// print the cluster's current master version
///
/// A missing cluster is reported on stderr. Master resolution only needs
/// the provider's server config and still succeeds, followed by an empty
/// current-version line; node resolution needs the current master version
/// and fails.
pub async fn handle_version(
    conn: &ConnectionManager,
    args: &VersionArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let mut controller = conn.controller(0, None)?;
    controller.fetch_existing().await?;
    if !controller.handle().has_snapshot() {
        report_missing(&conn.cluster.cluster_name);
    }

    let resolved = if args.master {
        controller
            .latest_master_version_for_series(&args.version)
            .await?
    } else {
        controller
            .latest_node_version_for_series(&args.version)
            .await?
    };

    let current = controller
        .handle()
        .snapshot()
        .map(|cluster| cluster.current_master_version.as_str())
        .unwrap_or_default();

    debug!(
        requested_version = %args.version,
        resolved_version = %resolved,
        master_version = current,
        master = args.master,
        "Resolved version"
    );
    print_resolved_version(&resolved, current, output)
}

/// Print the cluster's current master version, or an empty line when the
/// cluster does not exist
///
/// The series flags are accepted for parity with `version` and otherwise
/// ignored.
pub async fn handle_gke_version(
    conn: &ConnectionManager,
    args: &VersionArgs,
    output: OutputFormat,
) -> CliResult<()> {
    debug!(
        requested_version = %args.version,
        master = args.master,
        "Series flags do not affect gke-version output"
    );

    let mut controller = conn.controller(0, None)?;
    let version = match controller.fetch_existing().await? {
        Some(cluster) => cluster.current_master_version.clone(),
        None => {
            report_missing(&conn.cluster.cluster_name);
            String::new()
        }
    };
    print_version(&version, output)
}

fn report_missing(cluster_name: &str) {
    CliDiagnostic::error(&format!("cluster {} doesn't exist", cluster_name))
        .tip("Create it with: gkectl create --node-count <n>")
        .print();
}
