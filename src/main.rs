// file: src/main.rs
// version: 2.0.0
// guid: h8i9j0k1-l2m3-4567-8901-234567hijklm

//! Cortex cluster config - Main entry point

use clap::Parser;
use cortex_cluster_config::{
    cli::{
        args::Cli,
        commands::run_command,
        runner::{exit_code, run_blocking, EXIT_INTERRUPTED},
    },
    logging::logger,
    ClusterConfigError,
};
use std::time::Duration;
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    let shutdown_signal = async {
        if signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    let deadline = cli.timeout.map(Duration::from_secs);
    let command = cli.command;

    tokio::select! {
        result = run_blocking(deadline, move || run_command(command)) => {
            if let Err(e) = result {
                match &e {
                    ClusterConfigError::Timeout(msg) => error!("Timeout: {}", msg),
                    _ => eprintln!("error: {}", e),
                }
                std::process::exit(exit_code(&e));
            }
        },
        _ = shutdown_signal => {
            warn!("Interrupted by user");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
}
