//! Output formatting for command results

use crate::cli::OutputFormat;
use crate::error::Result as CliResult;
use gkectl_core::Cluster;
use serde::Serialize;
use std::io::Write;

/// Print a single resolved version
///
/// Text output is the bare version on its own line so scripts can capture it.
pub fn print_version(version: &str, format: OutputFormat) -> CliResult<()> {
    #[derive(Serialize)]
    struct VersionOutput<'a> {
        version: &'a str,
    }

    print_with(&VersionOutput { version }, format, |out| {
        writeln!(out, "{}", version)
    })
}

/// Print a resolved version followed by the cluster's current master version
///
/// Text output is two lines; the second is empty when the cluster does not
/// exist yet.
pub fn print_resolved_version(
    resolved: &str,
    current_master_version: &str,
    format: OutputFormat,
) -> CliResult<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ResolvedOutput<'a> {
        version: &'a str,
        current_master_version: &'a str,
    }

    let value = ResolvedOutput {
        version: resolved,
        current_master_version,
    };
    print_with(&value, format, |out| {
        writeln!(out, "{}", resolved)?;
        writeln!(out, "{}", current_master_version)
    })
}

/// Print a cluster snapshot
pub fn print_cluster(cluster: &Cluster, format: OutputFormat) -> CliResult<()> {
    print_with(cluster, format, |out| write_cluster_text(out, cluster))
}

fn print_with<T, F>(value: &T, format: OutputFormat, text: F) -> CliResult<()>
where
    T: Serialize,
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => text(&mut out)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(value)?)?,
    }
    Ok(())
}

fn write_cluster_text(out: &mut dyn Write, cluster: &Cluster) -> std::io::Result<()> {
    writeln!(out, "Name:            {}", cluster.name)?;
    writeln!(out, "Status:          {}", cluster.status)?;
    if let Some(message) = cluster.status_message.as_deref()
        && !message.is_empty()
    {
        writeln!(out, "Status message:  {}", message)?;
    }
    writeln!(out, "Master version:  {}", cluster.current_master_version)?;
    if let Some(node_version) = &cluster.current_node_version {
        writeln!(out, "Node version:    {}", node_version)?;
    }
    if let Some(count) = cluster.current_node_count {
        writeln!(out, "Node count:      {}", count)?;
    }
    if !cluster.locations.is_empty() {
        writeln!(out, "Zones:           {}", cluster.locations.join(", "))?;
    }
    if let Some(endpoint) = &cluster.endpoint {
        writeln!(out, "Endpoint:        {}", endpoint)?;
    }
    Ok(())
}
