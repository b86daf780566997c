//! Per-invocation configuration
//!
//! Every value here is built once from command-line flags and environment
//! variables and then passed by reference into the controller and client.
//! Nothing in the core reads process-wide state.
//!
//! There is no configuration file: all cluster state lives remotely.

pub mod error;

use std::time::Duration;

use crate::operation::DEFAULT_POLL_INTERVAL;

pub use error::{ConfigError, Result};

/// Default endpoint of the container API
pub const DEFAULT_API_URL: &str = "https://container.googleapis.com";

/// User agent string sent with every API request
pub const DEFAULT_USER_AGENT: &str = concat!("gkectl/", env!("CARGO_PKG_VERSION"));

/// Identity of the cluster a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub project: String,
    pub location: String,
    pub cluster_name: String,
}

impl ClusterConfig {
    /// Validate and assemble the cluster identity
    pub fn new(
        project: Option<String>,
        location: Option<String>,
        cluster_name: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            project: required("project", project)?,
            location: required("location", location)?,
            cluster_name: required("cluster-name", cluster_name)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField { field }),
    }
}

/// Connection settings for the container API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub access_token: Option<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            access_token: access_token.filter(|t| !t.is_empty()),
            ..Default::default()
        }
    }
}

/// Polling behaviour of the operation waiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub interval: Duration,
    /// Caller-supplied deadline for a single wait; `None` waits until the
    /// remote side reaches a terminal state or the caller cancels
    pub timeout: Option<Duration>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl WaitConfig {
    pub fn from_secs(interval_secs: u64, timeout_secs: Option<u64>) -> Result<Self> {
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll-interval",
                message: "must be at least 1 second".to_string(),
            });
        }
        Ok(Self {
            interval: Duration::from_secs(interval_secs),
            timeout: timeout_secs.map(Duration::from_secs),
        })
    }
}
