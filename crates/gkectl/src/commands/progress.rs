//! Spinner output while the CLI waits on remote operations

use gkectl_core::{OperationStatus, ProgressCallback, ProgressEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Build a progress callback that drives a stderr spinner
///
/// The same bar is reused for every operation a controller waits on, so a
/// create followed by a refresh keeps a single line on the terminal.
pub fn spinner_callback() -> ProgressCallback {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);

    Arc::new(move |event: ProgressEvent| match &event {
        ProgressEvent::Started { operation_id } => {
            pb.reset_elapsed();
            pb.set_message(format!("Operation {} started", operation_id));
        }
        ProgressEvent::Polling {
            operation_id,
            operation_type,
            status,
            ..
        } => {
            pb.tick();
            pb.set_message(format!(
                "{} {}: {}",
                describe_type(operation_type),
                operation_id,
                format_operation_status(*status)
            ));
        }
        ProgressEvent::Completed { operation_id } => {
            pb.finish_with_message(format!(
                "Operation {}: {}",
                operation_id,
                format_operation_status(OperationStatus::Done)
            ));
        }
        ProgressEvent::Failed {
            operation_id,
            error,
        } => {
            pb.abandon_with_message(format!("Operation {} failed: {}", operation_id, error));
        }
    })
}

fn describe_type(operation_type: &str) -> &str {
    if operation_type.is_empty() {
        "Operation"
    } else {
        operation_type
    }
}

/// Format operation status for display with status icons
fn format_operation_status(status: OperationStatus) -> String {
    match status {
        OperationStatus::Done => format!("\u{2713} {}", status), // checkmark
        OperationStatus::Error => format!("\u{2717} {}", status), // x mark
        OperationStatus::Aborting => format!("\u{2298} {}", status), // circle slash
        OperationStatus::Pending | OperationStatus::Running => format!("\u{21bb} {}", status), // arrow circle
        OperationStatus::StatusUnspecified => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_operation_status_icons() {
        assert_eq!(format_operation_status(OperationStatus::Done), "\u{2713} DONE");
        assert_eq!(format_operation_status(OperationStatus::Error), "\u{2717} ERROR");
        assert_eq!(
            format_operation_status(OperationStatus::Running),
            "\u{21bb} RUNNING"
        );
    }

    #[test]
    fn test_describe_type_falls_back_for_missing_type() {
        assert_eq!(describe_type(""), "Operation");
        assert_eq!(describe_type("UPGRADE_MASTER"), "UPGRADE_MASTER");
    }

    #[test]
    fn test_spinner_accepts_full_event_sequence() {
        let callback = spinner_callback();
        callback(ProgressEvent::Started {
            operation_id: "op-1".to_string(),
        });
        callback(ProgressEvent::Polling {
            operation_id: "op-1".to_string(),
            operation_type: "CREATE_CLUSTER".to_string(),
            status: OperationStatus::Running,
            elapsed: Duration::from_secs(3),
        });
        callback(ProgressEvent::Completed {
            operation_id: "op-1".to_string(),
        });
    }
}
