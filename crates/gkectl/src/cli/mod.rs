//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};

/// Managed Kubernetes cluster lifecycle CLI
#[derive(Parser, Debug)]
#[command(name = "gkectl")]
#[command(version, about = "Provides an interface to more easily manage GKE clusters")]
#[command(long_about = "
Provides an interface to more easily manage GKE clusters

Creates clusters, upgrades control planes and node pools, and resolves
release series such as \"1.9\" or \"latest\" against the versions the
provider currently supports.

EXAMPLES:
    # Create (or adopt) a three-node cluster
    gkectl create --project my-project --location us-central1-a --cluster-name demo --node-count 3

    # Resolve the newest 1.9 master version
    gkectl version --project my-project --location us-central1-a --cluster-name demo --version 1.9

    # Upgrade the control plane, then level the node pools up to it
    gkectl upgrade master --version 1.10 --project my-project --location us-central1-a --cluster-name demo
    gkectl upgrade nodes --version latest --project my-project --location us-central1-a --cluster-name demo
")]
pub struct Cli {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub wait: WaitArgs,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Cluster identity, shared by every command
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// GCP project to run against
    #[arg(long, global = true, env = "GKECTL_PROJECT")]
    pub project: Option<String>,

    /// Region or zone to use
    #[arg(long, global = true, env = "GKECTL_LOCATION")]
    pub location: Option<String>,

    /// Name of cluster
    #[arg(long, global = true, env = "GKECTL_CLUSTER_NAME")]
    pub cluster_name: Option<String>,
}

/// Container API connection settings
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the container API
    #[arg(
        long,
        global = true,
        env = "GKECTL_API_URL",
        default_value = gkectl_core::config::DEFAULT_API_URL
    )]
    pub api_url: String,

    /// OAuth access token (falls back to GOOGLE_OAUTH_ACCESS_TOKEN)
    #[arg(long, global = true, env = "GKECTL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Operation polling settings
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Seconds between operation polls
    #[arg(long, global = true, default_value = "3")]
    pub poll_interval: u64,

    /// Give up waiting on an operation after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a cluster, or adopt it if it already exists
    #[command(after_help = "EXIT CODES:
    0  cluster is ready; its control-plane version is printed
    1  invalid arguments or API failure
    2  cluster exists but is in ERROR state
")]
    Create {
        /// Initial number of nodes
        #[arg(long, default_value = "0")]
        node_count: u32,
    },

    /// Returns proper master and node versions for the given inputs
    Version(VersionArgs),

    /// Prints the cluster's current master version
    ///
    /// Accepts the same flags as `version`; they do not change the output.
    #[command(name = "gke-version")]
    GkeVersion(VersionArgs),

    /// Upgrade the control plane or node pools
    #[command(subcommand)]
    Upgrade(UpgradeCommands),

    /// Show the cluster's current state
    Status,
}

#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Query for master version. Queries for node version if false
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub master: bool,

    /// Release series to resolve, or "latest"
    #[arg(long, default_value = gkectl_core::LATEST)]
    pub version: String,
}

#[derive(Subcommand, Debug)]
pub enum UpgradeCommands {
    /// Upgrade the control plane to the newest version in a series
    Master {
        /// Release series to upgrade to, or "latest"
        #[arg(long, default_value = gkectl_core::LATEST)]
        version: String,
    },

    /// Level node pools up to the control plane version
    Nodes {
        /// Release series the nodes are expected in, or "latest"
        #[arg(long, default_value = gkectl_core::LATEST)]
        version: String,
    },
}
