//! Error types for gkectl
//!
//! Core failures are mapped onto CLI errors here, and this is the only
//! place that decides process exit codes.

use colored::Colorize;
use gkectl_core::{ApiError, ClusterStatus, ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Must specify a project
///
///   tip: pass --project or set GKECTL_PROJECT
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for tip in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", tip);
        }
    }
}

/// Main error type for the gkectl application
#[derive(Error, Debug)]
pub enum GkeCtlError {
    #[error("{0}")]
    Configuration(#[from] ConfigError),

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Temporary API failure: {message}")]
    Transient { message: String },

    #[error("Cluster in bad state: {status}: {message}")]
    ClusterState {
        status: ClusterStatus,
        message: String,
    },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("{message}")]
    Version { message: String },

    #[error("Cluster not found: {message}")]
    NotFound { message: String },

    #[error("Interrupted: {message}")]
    Interrupted { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for gkectl operations
pub type Result<T> = std::result::Result<T, GkeCtlError>;

impl GkeCtlError {
    /// Process exit code: 2 for a cluster found in ERROR state, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            GkeCtlError::ClusterState {
                status: ClusterStatus::Error,
                ..
            } => 2,
            _ => 1,
        }
    }

    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            GkeCtlError::Configuration(ConfigError::MissingField { field }) => vec![format!(
                "pass --{} or set GKECTL_{}",
                field,
                field.to_uppercase().replace('-', "_")
            )],
            GkeCtlError::AuthenticationFailed { .. } => vec![
                "Provide a token with --access-token or GKECTL_ACCESS_TOKEN".to_string(),
                "A fresh token can be printed with: gcloud auth print-access-token".to_string(),
            ],
            GkeCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the API URL is correct: --api-url".to_string(),
            ],
            GkeCtlError::Transient { .. } => vec![
                "Re-run the command; create and upgrade pick up where they left off".to_string(),
            ],
            GkeCtlError::Version { .. } => vec![
                "Node versions can never exceed the control plane version".to_string(),
                "Resolve the newest supported series with: gkectl version --version latest"
                    .to_string(),
            ],
            GkeCtlError::NotFound { .. } => {
                vec!["Create the cluster first: gkectl create --node-count <n>".to_string()]
            }
            GkeCtlError::Interrupted { .. } => vec![
                "The remote operation keeps running; check it later with: gkectl status"
                    .to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let GkeCtlError::ClusterState { status, .. } = self {
            diag = diag.detail(&format!("cluster status: {}", status));
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<ApiError> for GkeCtlError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { message } | ApiError::PermissionDenied { message } => {
                GkeCtlError::AuthenticationFailed { message }
            }
            ApiError::NotFound { message } => GkeCtlError::NotFound { message },
            ApiError::Request(e) => GkeCtlError::ConnectionError {
                message: e.to_string(),
            },
            _ if err.is_retryable() => GkeCtlError::Transient {
                message: err.to_string(),
            },
            _ => GkeCtlError::ApiError {
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for GkeCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Client(api) => GkeCtlError::from(api),
            CoreError::ClusterState { status, message } => {
                GkeCtlError::ClusterState { status, message }
            }
            e @ CoreError::OperationFailed { .. } => GkeCtlError::OperationFailed {
                message: e.to_string(),
            },
            e @ (CoreError::VersionNotFound { .. } | CoreError::MalformedVersion { .. }) => {
                GkeCtlError::Version {
                    message: e.to_string(),
                }
            }
            CoreError::NotFound(message) => GkeCtlError::NotFound { message },
            e @ (CoreError::Cancelled { .. } | CoreError::DeadlineExceeded { .. }) => {
                GkeCtlError::Interrupted {
                    message: e.to_string(),
                }
            }
            e @ CoreError::InvalidResponse(_) => GkeCtlError::ApiError {
                message: e.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for GkeCtlError {
    fn from(err: serde_json::Error) -> Self {
        GkeCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for GkeCtlError {
    fn from(err: serde_yaml::Error) -> Self {
        GkeCtlError::OutputError {
            message: format!("YAML error: {}", err),
        }
    }
}

impl From<std::io::Error> for GkeCtlError {
    fn from(err: std::io::Error) -> Self {
        GkeCtlError::OutputError {
            message: format!("Failed writing to stdout: {}", err),
        }
    }
}
