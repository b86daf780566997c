//! Cluster lifecycle controller
//!
//! [`ClusterController`] owns one [`ClusterHandle`] and is the only
//! component that mutates remote state. Every mutating call issues a single
//! request, blocks in the [`OperationWaiter`] until the returned operation is
//! terminal, then refreshes the handle's snapshot.
//!
//! Operations on one handle are serialized by `&mut self`; there is no
//! locking across handles that point at the same remote cluster.

use tracing::{debug, info, warn};

use crate::api::{
    Cluster, ClusterManager, ClusterSpec, ClusterStatus, ClusterUpdate, CreateClusterRequest,
    Operation,
};
use crate::config::ClusterConfig;
use crate::error::{CoreError, Result};
use crate::operation::{OperationWaiter, ProgressCallback};
use crate::version;

/// Cluster identity plus the last snapshot fetched from the API
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterHandle {
    pub project: String,
    pub location: String,
    pub name: String,
    /// Initial node count, only used when the cluster has to be created
    pub requested_node_count: u32,
    snapshot: Option<Cluster>,
}

impl ClusterHandle {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        name: impl Into<String>,
        requested_node_count: u32,
    ) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            name: name.into(),
            requested_node_count,
            snapshot: None,
        }
    }

    pub fn from_config(config: &ClusterConfig, requested_node_count: u32) -> Self {
        Self::new(
            &config.project,
            &config.location,
            &config.cluster_name,
            requested_node_count,
        )
    }

    /// Snapshot, if the cluster has been fetched or created
    pub fn snapshot(&self) -> Option<&Cluster> {
        self.snapshot.as_ref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Snapshot, failing when it has not been fetched yet
    pub fn require_snapshot(&self) -> Result<&Cluster> {
        self.snapshot.as_ref().ok_or_else(|| {
            CoreError::NotFound(format!(
                "cluster {} in {}/{} has not been fetched",
                self.name, self.project, self.location
            ))
        })
    }

    pub fn current_master_version(&self) -> Result<&str> {
        Ok(self.require_snapshot()?.current_master_version.as_str())
    }

    pub fn status(&self) -> Result<ClusterStatus> {
        Ok(self.require_snapshot()?.status)
    }

    pub fn status_message(&self) -> Result<Option<&str>> {
        Ok(self.require_snapshot()?.status_message.as_deref())
    }

    /// Fail with [`CoreError::ClusterState`] for ERROR or DEGRADED clusters
    pub fn ensure_healthy(&self) -> Result<()> {
        let status = self.status()?;
        if status.is_unhealthy() {
            return Err(CoreError::ClusterState {
                status,
                message: self.status_message()?.unwrap_or_default().to_string(),
            });
        }
        Ok(())
    }
}

/// Drives a cluster's existence and versions
pub struct ClusterController<A> {
    api: A,
    handle: ClusterHandle,
    waiter: OperationWaiter,
    on_progress: Option<ProgressCallback>,
}

impl<A: ClusterManager> ClusterController<A> {
    pub fn new(api: A, handle: ClusterHandle, waiter: OperationWaiter) -> Self {
        Self {
            api,
            handle,
            waiter,
            on_progress: None,
        }
    }

    /// Report operation progress to `callback` during every wait
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn handle(&self) -> &ClusterHandle {
        &self.handle
    }

    /// Adopt the cluster if it exists, otherwise create it
    ///
    /// Idempotent: an existing cluster never triggers a create request. An
    /// ERROR or DEGRADED cluster is reported as [`CoreError::ClusterState`]
    /// with the snapshot kept on the handle.
    pub async fn create(&mut self) -> Result<&Cluster> {
        match self.fetch().await {
            Ok(cluster) => {
                info!(
                    project = %self.handle.project,
                    location = %self.handle.location,
                    cluster_name = %self.handle.name,
                    status = %cluster.status,
                    "Cluster already exists, adopting it"
                );
                self.handle.snapshot = Some(cluster);
            }
            Err(CoreError::Client(e)) if e.is_not_found() => {
                let request = CreateClusterRequest {
                    cluster: ClusterSpec {
                        name: self.handle.name.clone(),
                        initial_node_count: self.handle.requested_node_count,
                    },
                };
                info!(
                    project = %self.handle.project,
                    location = %self.handle.location,
                    cluster_name = %self.handle.name,
                    node_count = self.handle.requested_node_count,
                    "Creating cluster"
                );

                let operation = self
                    .api
                    .create_cluster(&self.handle.project, &self.handle.location, &request)
                    .await?;
                self.await_operation(operation).await?;
                self.refresh().await?;
            }
            Err(e) => return Err(e),
        }

        self.handle.ensure_healthy()?;
        self.handle.require_snapshot()
    }

    /// Upgrade the control plane to an already resolved `version`
    ///
    /// The string is passed through untouched; an invalid version surfaces
    /// as an API error.
    pub async fn upgrade_control_plane(&mut self, version: &str) -> Result<&Cluster> {
        info!(
            cluster_name = %self.handle.name,
            target_version = version,
            "Upgrading control plane"
        );
        self.update(ClusterUpdate::master_version(version)).await
    }

    /// Level node pools up to the control plane's current version
    ///
    /// The target sent to the API is always the snapshot's master version so
    /// nodes never outpace the master; `version` is only recorded.
    pub async fn upgrade_nodes(&mut self, version: &str) -> Result<&Cluster> {
        let target = self.handle.current_master_version()?.to_string();
        if target != version {
            warn!(
                requested_version = version,
                master_version = %target,
                "Node pools track the control plane; upgrading to the master version"
            );
        }
        info!(
            cluster_name = %self.handle.name,
            target_version = %target,
            "Upgrading node pools"
        );
        self.update(ClusterUpdate::node_version(target)).await
    }

    /// Re-fetch the snapshot
    pub async fn refresh(&mut self) -> Result<&Cluster> {
        let cluster = self.fetch().await?;
        self.handle.snapshot = Some(cluster);
        self.handle.require_snapshot()
    }

    /// Refresh the snapshot, treating a missing cluster as `None`
    pub async fn fetch_existing(&mut self) -> Result<Option<&Cluster>> {
        match self.fetch().await {
            Ok(cluster) => {
                self.handle.snapshot = Some(cluster);
                Ok(self.handle.snapshot.as_ref())
            }
            Err(CoreError::Client(e)) if e.is_not_found() => {
                debug!(cluster_name = %self.handle.name, "Cluster does not exist");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Newest valid master version in `series` ("latest" for the newest overall)
    pub async fn latest_master_version_for_series(&self, series: &str) -> Result<String> {
        let config = self
            .api
            .get_server_config(&self.handle.project, &self.handle.location)
            .await?;
        version::resolve_master_series(series, &config.valid_master_versions)
    }

    /// Newest valid node version in `series` that does not outpace the master
    pub async fn latest_node_version_for_series(&self, series: &str) -> Result<String> {
        let master = self.handle.current_master_version()?;
        let config = self
            .api
            .get_server_config(&self.handle.project, &self.handle.location)
            .await?;
        version::resolve_node_series(series, &config.valid_node_versions, master)
    }

    async fn fetch(&self) -> Result<Cluster> {
        Ok(self
            .api
            .get_cluster(&self.handle.project, &self.handle.location, &self.handle.name)
            .await?)
    }

    async fn update(&mut self, update: ClusterUpdate) -> Result<&Cluster> {
        let operation = self
            .api
            .update_cluster(
                &self.handle.project,
                &self.handle.location,
                &self.handle.name,
                &update,
            )
            .await?;
        self.await_operation(operation).await?;
        self.refresh().await
    }

    async fn await_operation(&self, operation: Operation) -> Result<Operation> {
        if operation.name.is_empty() {
            return Err(CoreError::InvalidResponse(
                "operation returned without an id".to_string(),
            ));
        }
        debug!(
            operation_id = %operation.name,
            operation_type = %operation.operation_type,
            "Tracking operation"
        );
        self.waiter
            .wait_with_progress(
                &self.api,
                &self.handle.project,
                &self.handle.location,
                &operation.name,
                self.on_progress.as_ref(),
            )
            .await
    }
}
