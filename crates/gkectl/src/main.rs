use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::GkeCtlError;

/// Exit code for a second Ctrl-C, which skips the diagnostic
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Ctrl-C stops local waiting; remote operations keep running
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, no longer waiting on remote operations");
            signal_token.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    let command = execute_command(&cli, cancel.clone());
    if let Err(e) = run_until_cancelled(command, &cancel).await {
        e.print_diagnostic();
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Drive `command` until it finishes or `cancel` fires
///
/// The waiter reports its own cancellation; this covers in-flight API calls
/// that are not inside a poll sleep.
async fn run_until_cancelled<F>(command: F, cancel: &CancellationToken) -> Result<(), GkeCtlError>
where
    F: Future<Output = Result<(), GkeCtlError>>,
{
    tokio::select! {
        biased;
        result = command => result,
        _ = cancel.cancelled() => Err(GkeCtlError::Interrupted {
            message: "cancelled before the command finished".to_string(),
        }),
    }
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "gkectl=warn,gkectl_core=warn",
            1 => "gkectl=info,gkectl_core=info",
            2 => "gkectl=debug,gkectl_core=debug",
            _ => "gkectl=trace,gkectl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, cancel: CancellationToken) -> Result<(), GkeCtlError> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let conn = ConnectionManager::from_cli(cli, cancel)?;

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Create { node_count } => {
            commands::cluster::handle_create(&conn, *node_count, cli.output).await
        }
        Commands::Version(args) => commands::version::handle_version(&conn, args, cli.output).await,
        Commands::GkeVersion(args) => {
            commands::version::handle_gke_version(&conn, args, cli.output).await
        }
        Commands::Upgrade(command) => {
            commands::upgrade::handle_upgrade(&conn, command, cli.output).await
        }
        Commands::Status => commands::cluster::handle_status(&conn, cli.output).await,
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!(
            "Command completed successfully in {:.3}s",
            duration.as_secs_f64()
        ),
        Err(e) => warn!("Command failed after {:.3}s: {}", duration.as_secs_f64(), e),
    }

    result
}

/// Format command for human-readable logging
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Create { node_count } => format!("create --node-count {}", node_count),
        Commands::Version(args) => {
            format!("version --master={} --version {}", args.master, args.version)
        }
        Commands::GkeVersion(args) => {
            format!("gke-version --master={} --version {}", args.master, args.version)
        }
        Commands::Upgrade(cli::UpgradeCommands::Master { version }) => {
            format!("upgrade master --version {}", version)
        }
        Commands::Upgrade(cli::UpgradeCommands::Nodes { version }) => {
            format!("upgrade nodes --version {}", version)
        }
        Commands::Status => "status".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_command() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = run_until_cancelled(std::future::pending(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, GkeCtlError::Interrupted { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_finished_command_result_is_kept() {
        let cancel = CancellationToken::new();
        assert!(run_until_cancelled(async { Ok(()) }, &cancel).await.is_ok());

        // a command that completes on the same poll as the signal still wins
        cancel.cancel();
        let err = run_until_cancelled(
            async {
                Err(GkeCtlError::NotFound {
                    message: "demo".to_string(),
                })
            },
            &cancel,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GkeCtlError::NotFound { .. }));
    }

    #[test]
    fn test_format_command_names_subcommand_flags() {
        let cli = Cli::try_parse_from(["gkectl", "gke-version", "--version", "1.9"]).unwrap();
        assert_eq!(
            format_command(&cli.command),
            "gke-version --master=true --version 1.9"
        );
    }
}
