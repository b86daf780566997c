//! Long-running operation polling
//!
//! Mutating container API calls return an [`Operation`] that must be polled
//! until it reaches DONE, ERROR or ABORTING. [`OperationWaiter`] turns that
//! into a blocking call, optionally reporting progress through a callback,
//! or into a stream of observed states via [`OperationWaiter::watch`].
//!
//! The poll loop has no retry limit of its own. A wait ends when the remote
//! side reaches a terminal state, when a fetch fails, when the caller's
//! [`CancellationToken`] fires, or when the configured deadline elapses.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ClusterManager, Operation, OperationStatus};
use crate::config::WaitConfig;
use crate::error::{CoreError, Result};

/// Reference interval between two polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Progress events emitted while waiting on an operation
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Waiting has started
    Started { operation_id: String },
    /// Non-terminal status observed
    Polling {
        operation_id: String,
        operation_type: String,
        status: OperationStatus,
        elapsed: Duration,
    },
    /// Operation reached DONE
    Completed { operation_id: String },
    /// Operation reached ERROR or ABORTING
    Failed { operation_id: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to drive a spinner. Shared so one controller can reuse
/// it across several operations.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Item yielded by [`OperationWaiter::watch`]
///
/// Every non-terminal observation arrives as `Ok`; the last item is either
/// the DONE operation or the error that ended the wait.
pub type OperationProgress = Result<Operation>;

/// Polls operations to completion
#[derive(Debug, Clone, Default)]
pub struct OperationWaiter {
    config: WaitConfig,
    cancel: CancellationToken,
}

impl OperationWaiter {
    pub fn new(config: WaitConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort in-flight waits when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Block until the operation is terminal
    pub async fn wait<A>(
        &self,
        api: &A,
        project: &str,
        location: &str,
        operation_id: &str,
    ) -> Result<Operation>
    where
        A: ClusterManager + ?Sized,
    {
        self.wait_with_progress(api, project, location, operation_id, None)
            .await
    }

    /// Block until the operation is terminal, reporting each observation
    pub async fn wait_with_progress<A>(
        &self,
        api: &A,
        project: &str,
        location: &str,
        operation_id: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<Operation>
    where
        A: ClusterManager + ?Sized,
    {
        let start = Instant::now();
        emit(
            on_progress,
            ProgressEvent::Started {
                operation_id: operation_id.to_string(),
            },
        );

        let result = self
            .poll(api, project, location, operation_id, |operation| {
                if operation.status.is_terminal() {
                    return;
                }
                info!(
                    operation_id,
                    operation_type = %operation.operation_type,
                    operation_status = %operation.status,
                    "Waiting for operation"
                );
                emit(
                    on_progress,
                    ProgressEvent::Polling {
                        operation_id: operation_id.to_string(),
                        operation_type: operation.operation_type.clone(),
                        status: operation.status,
                        elapsed: start.elapsed(),
                    },
                );
            })
            .await;

        match &result {
            Ok(operation) => {
                info!(
                    operation_id,
                    operation_status = %operation.status,
                    elapsed_secs = start.elapsed().as_secs(),
                    "Operation completed"
                );
                emit(
                    on_progress,
                    ProgressEvent::Completed {
                        operation_id: operation_id.to_string(),
                    },
                );
            }
            Err(e) => {
                warn!(operation_id, error = %e, "Operation wait failed");
                emit(
                    on_progress,
                    ProgressEvent::Failed {
                        operation_id: operation_id.to_string(),
                        error: e.to_string(),
                    },
                );
            }
        }

        result
    }

    /// Poll in a background task, streaming every observed state
    ///
    /// The stream closes right after the terminal item. Dropping the stream
    /// stops the polling task.
    pub fn watch<A>(
        &self,
        api: Arc<A>,
        project: impl Into<String>,
        location: impl Into<String>,
        operation_id: impl Into<String>,
    ) -> UnboundedReceiverStream<OperationProgress>
    where
        A: ClusterManager + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let waiter = self.clone();
        let project = project.into();
        let location = location.into();
        let operation_id = operation_id.into();

        tokio::spawn(async move {
            let progress = tx.clone();
            let outcome = tokio::select! {
                result = waiter.poll(api.as_ref(), &project, &location, &operation_id, |operation| {
                    if !operation.status.is_terminal() {
                        let _ = progress.send(Ok(operation.clone()));
                    }
                }) => Some(result),
                _ = tx.closed() => None,
            };

            match outcome {
                Some(result) => {
                    let _ = tx.send(result);
                }
                None => debug!(%operation_id, "Operation watcher dropped, stopped polling"),
            }
        });

        UnboundedReceiverStream::new(rx)
    }

    async fn poll<A, F>(
        &self,
        api: &A,
        project: &str,
        location: &str,
        operation_id: &str,
        mut on_status: F,
    ) -> Result<Operation>
    where
        A: ClusterManager + ?Sized,
        F: FnMut(&Operation) + Send,
    {
        let deadline = self.config.timeout.map(|t| Instant::now() + t);

        loop {
            let operation = self
                .interruptible(
                    api.get_operation(project, location, operation_id),
                    deadline,
                    operation_id,
                )
                .await??;

            on_status(&operation);

            match operation.status {
                OperationStatus::Done => return Ok(operation),
                status if status.is_failure() => {
                    return Err(CoreError::OperationFailed {
                        operation_id: operation_id.to_string(),
                        status,
                        detail: operation.failure_detail(),
                    });
                }
                _ => {}
            }

            self.interruptible(
                tokio::time::sleep(self.config.interval),
                deadline,
                operation_id,
            )
            .await?;
        }
    }

    /// Race `fut` against cancellation and the deadline
    async fn interruptible<T>(
        &self,
        fut: impl Future<Output = T>,
        deadline: Option<Instant>,
        operation_id: &str,
    ) -> Result<T> {
        let expiry = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CoreError::Cancelled {
                operation_id: operation_id.to_string(),
            }),
            _ = expiry => Err(CoreError::DeadlineExceeded {
                operation_id: operation_id.to_string(),
                timeout: self.config.timeout.unwrap_or_default(),
            }),
            out = fut => Ok(out),
        }
    }
}

/// Helper to emit progress events
fn emit(callback: Option<&ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
