//! Connection management for the container API

use crate::cli::{Cli, ClusterArgs, ConnectionArgs, WaitArgs};
use crate::error::Result as CliResult;
use gkectl_core::{
    ClientConfig, ClusterConfig, ClusterController, ClusterHandle, ContainerClient,
    OperationWaiter, ProgressCallback, WaitConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Fallback environment variable for the OAuth access token
pub const FALLBACK_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Everything a command needs to talk to one cluster
///
/// Built once per invocation from flags and environment; every setting is
/// validated up front so a bad flag never reaches the network.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    pub cluster: ClusterConfig,
    pub client: ClientConfig,
    pub wait: WaitConfig,
    cancel: CancellationToken,
}

impl ConnectionManager {
    pub fn from_cli(cli: &Cli, cancel: CancellationToken) -> CliResult<Self> {
        Self::new(&cli.cluster, &cli.connection, &cli.wait, cancel)
    }

    pub fn new(
        cluster: &ClusterArgs,
        connection: &ConnectionArgs,
        wait: &WaitArgs,
        cancel: CancellationToken,
    ) -> CliResult<Self> {
        let cluster = ClusterConfig::new(
            cluster.project.clone(),
            cluster.location.clone(),
            cluster.cluster_name.clone(),
        )?;
        let wait = WaitConfig::from_secs(wait.poll_interval, wait.timeout)?;
        let client = ClientConfig::new(
            connection.api_url.clone(),
            resolve_access_token(connection.access_token.clone()),
        );

        debug!(
            project = %cluster.project,
            location = %cluster.location,
            cluster_name = %cluster.cluster_name,
            api_url = %client.api_url,
            "Resolved connection settings"
        );

        Ok(Self {
            cluster,
            client,
            wait,
            cancel,
        })
    }

    /// Build a controller for the configured cluster
    pub fn controller(
        &self,
        requested_node_count: u32,
        on_progress: Option<ProgressCallback>,
    ) -> CliResult<ClusterController<ContainerClient>> {
        trace!("Creating container API client");
        let client = ContainerClient::new(&self.client)?;
        let waiter = OperationWaiter::new(self.wait).with_cancellation(self.cancel.clone());
        let handle = ClusterHandle::from_config(&self.cluster, requested_node_count);

        let controller = ClusterController::new(client, handle, waiter);
        Ok(match on_progress {
            Some(callback) => controller.with_progress(callback),
            None => controller,
        })
    }
}

/// Explicit flag or GKECTL_ACCESS_TOKEN first, then the gcloud-style variable
fn resolve_access_token(explicit: Option<String>) -> Option<String> {
    explicit
        .filter(|t| !t.is_empty())
        .or_else(|| std::env::var(FALLBACK_TOKEN_ENV).ok())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn cluster_args(project: Option<&str>) -> ClusterArgs {
        ClusterArgs {
            project: project.map(str::to_string),
            location: Some("us-central1-a".to_string()),
            cluster_name: Some("demo".to_string()),
        }
    }

    fn connection_args(token: Option<&str>) -> ConnectionArgs {
        ConnectionArgs {
            api_url: "http://localhost:8080".to_string(),
            access_token: token.map(str::to_string),
        }
    }

    fn wait_args() -> WaitArgs {
        WaitArgs {
            poll_interval: 3,
            timeout: None,
        }
    }

    #[test]
    fn test_missing_project_is_rejected() {
        let err = ConnectionManager::new(
            &cluster_args(None),
            &connection_args(None),
            &wait_args(),
            CancellationToken::new(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Must specify a project");
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let wait = WaitArgs {
            poll_interval: 0,
            timeout: None,
        };
        assert!(
            ConnectionManager::new(
                &cluster_args(Some("p")),
                &connection_args(None),
                &wait,
                CancellationToken::new(),
            )
            .is_err()
        );
    }

    #[test]
    #[serial]
    fn test_explicit_token_wins_over_fallback() {
        unsafe { std::env::set_var(FALLBACK_TOKEN_ENV, "from-env") };
        assert_eq!(
            resolve_access_token(Some("explicit".to_string())).as_deref(),
            Some("explicit")
        );
        assert_eq!(resolve_access_token(None).as_deref(), Some("from-env"));
        unsafe { std::env::remove_var(FALLBACK_TOKEN_ENV) };
    }

    #[test]
    #[serial]
    fn test_no_token_anywhere() {
        unsafe { std::env::remove_var(FALLBACK_TOKEN_ENV) };
        assert_eq!(resolve_access_token(None), None);
        assert_eq!(resolve_access_token(Some(String::new())), None);
    }
}
