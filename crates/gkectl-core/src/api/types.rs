//! Wire types for the container API (JSON, camelCase)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterStatus {
    Provisioning,
    Running,
    Reconciling,
    Stopping,
    Error,
    Degraded,
    #[default]
    #[serde(other)]
    StatusUnspecified,
}

impl ClusterStatus {
    /// ERROR and DEGRADED clusters are surfaced to the caller, never auto-healed
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, ClusterStatus::Error | ClusterStatus::Degraded)
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusterStatus::Provisioning => "PROVISIONING",
            ClusterStatus::Running => "RUNNING",
            ClusterStatus::Reconciling => "RECONCILING",
            ClusterStatus::Stopping => "STOPPING",
            ClusterStatus::Error => "ERROR",
            ClusterStatus::Degraded => "DEGRADED",
            ClusterStatus::StatusUnspecified => "STATUS_UNSPECIFIED",
        };
        f.write_str(s)
    }
}

/// Remote cluster snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_master_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node_version: Option<String>,
    #[serde(default)]
    pub status: ClusterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node_count: Option<u32>,
    /// Zones the cluster's nodes are spread across
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClusterRequest {
    pub cluster: ClusterSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    pub name: String,
    pub initial_node_count: u32,
}

/// Desired version change carried by an update request
///
/// Exactly one of the two fields is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_master_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_node_version: Option<String>,
}

impl ClusterUpdate {
    pub fn master_version(version: impl Into<String>) -> Self {
        Self {
            desired_master_version: Some(version.into()),
            desired_node_version: None,
        }
    }

    pub fn node_version(version: impl Into<String>) -> Self {
        Self {
            desired_master_version: None,
            desired_node_version: Some(version.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateClusterBody<'a> {
    pub update: &'a ClusterUpdate,
}

/// Status of a long-running operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
    Aborting,
    Error,
    #[default]
    #[serde(other)]
    StatusUnspecified,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Done | OperationStatus::Error | OperationStatus::Aborting
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OperationStatus::Error | OperationStatus::Aborting)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::Running => "RUNNING",
            OperationStatus::Done => "DONE",
            OperationStatus::Aborting => "ABORTING",
            OperationStatus::Error => "ERROR",
            OperationStatus::StatusUnspecified => "STATUS_UNSPECIFIED",
        };
        f.write_str(s)
    }
}

/// Error detail attached to a failed operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Long-running remote operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation id, used to poll it
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub operation_type: String,
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Operation {
    /// Best available description of why the operation failed
    pub fn failure_detail(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .or_else(|| self.status_message.clone().filter(|m| !m.is_empty()))
            .or_else(|| self.detail.clone().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| format!("operation ended with status {}", self.status))
    }
}

/// Versions the provider accepts, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default)]
    pub default_cluster_version: String,
    #[serde(default)]
    pub valid_master_versions: Vec<String>,
    #[serde(default)]
    pub valid_node_versions: Vec<String>,
}
