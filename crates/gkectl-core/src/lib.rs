//! # gkectl-core
//!
//! Shared engine for the `gkectl` CLI: drives a managed Kubernetes cluster
//! through creation and control-plane / node-pool upgrades.
//!
//! ## Layers
//!
//! - **[`api`]** - the remote container API, as a mockable [`ClusterManager`]
//!   trait plus a REST implementation ([`ContainerClient`])
//! - **[`operation`]** - polls long-running operations to a terminal state,
//!   with progress callbacks, a streaming form, cancellation and deadlines
//! - **[`version`]** - pure resolution of "1.9" / "latest" style requests
//!   against the provider's valid version lists
//! - **[`controller`]** - [`ClusterController`], the only component that
//!   mutates remote state
//!
//! ## Example
//!
//! ```rust,ignore
//! use gkectl_core::{ClusterController, ClusterHandle, ContainerClient, OperationWaiter};
//!
//! let client = ContainerClient::new(&client_config)?;
//! let handle = ClusterHandle::new("my-project", "us-central1", "demo", 3);
//! let mut controller = ClusterController::new(client, handle, OperationWaiter::default());
//!
//! controller.create().await?;
//! let target = controller.latest_master_version_for_series("1.9").await?;
//! controller.upgrade_control_plane(&target).await?;
//! controller.upgrade_nodes(&target).await?;
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod operation;
pub mod version;

pub use api::{
    ApiError, Cluster, ClusterManager, ClusterStatus, ClusterUpdate, ContainerClient,
    CreateClusterRequest, Operation, OperationStatus, ServerConfig,
};
pub use config::{ClientConfig, ClusterConfig, ConfigError, WaitConfig};
pub use controller::{ClusterController, ClusterHandle};
pub use error::{CoreError, Result};
pub use operation::{
    DEFAULT_POLL_INTERVAL, OperationProgress, OperationWaiter, ProgressCallback, ProgressEvent,
};
pub use version::{LATEST, resolve_master_series, resolve_node_series};
