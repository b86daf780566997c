//! Remote container API
//!
//! The lifecycle code talks to the provider only through the
//! [`ClusterManager`] trait so it can be exercised against mocks. The REST
//! implementation lives in [`client`].

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

pub use client::ContainerClient;
pub use error::{ApiError, ApiResult};
pub use types::{
    Cluster, ClusterSpec, ClusterStatus, ClusterUpdate, CreateClusterRequest, Operation,
    OperationError, OperationStatus, ServerConfig,
};

/// Operations consumed from the remote control-plane API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterManager: Send + Sync {
    /// Fetch a cluster by identity
    async fn get_cluster(&self, project: &str, location: &str, name: &str)
    -> ApiResult<Cluster>;

    /// Request creation of a cluster; returns the long-running operation
    async fn create_cluster(
        &self,
        project: &str,
        location: &str,
        request: &CreateClusterRequest,
    ) -> ApiResult<Operation>;

    /// Request a master or node version change; returns the long-running operation
    async fn update_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
        update: &ClusterUpdate,
    ) -> ApiResult<Operation>;

    /// Fetch the current state of an operation
    async fn get_operation(
        &self,
        project: &str,
        location: &str,
        operation_id: &str,
    ) -> ApiResult<Operation>;

    /// Fetch the versions the provider currently accepts for a location
    async fn get_server_config(&self, project: &str, location: &str) -> ApiResult<ServerConfig>;
}

#[async_trait]
impl<T: ClusterManager + ?Sized> ClusterManager for std::sync::Arc<T> {
    async fn get_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
    ) -> ApiResult<Cluster> {
        (**self).get_cluster(project, location, name).await
    }

    async fn create_cluster(
        &self,
        project: &str,
        location: &str,
        request: &CreateClusterRequest,
    ) -> ApiResult<Operation> {
        (**self).create_cluster(project, location, request).await
    }

    async fn update_cluster(
        &self,
        project: &str,
        location: &str,
        name: &str,
        update: &ClusterUpdate,
    ) -> ApiResult<Operation> {
        (**self).update_cluster(project, location, name, update).await
    }

    async fn get_operation(
        &self,
        project: &str,
        location: &str,
        operation_id: &str,
    ) -> ApiResult<Operation> {
        (**self).get_operation(project, location, operation_id).await
    }

    async fn get_server_config(&self, project: &str, location: &str) -> ApiResult<ServerConfig> {
        (**self).get_server_config(project, location).await
    }
}
