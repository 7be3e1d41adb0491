// file: src/cli/runner.rs
// version: 1.0.0
// guid: 5c0d2e8a-7f41-4b9e-a3d6-91e4c8b27f10

//! Blocking command execution under an optional deadline

use crate::error::ClusterConfigError;
use crate::Result;
use std::time::Duration;

/// Exit code for a command that exceeded its deadline
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit code for a command interrupted with Ctrl+C
pub const EXIT_INTERRUPTED: i32 = 130;

/// Run `job` on a blocking thread. With a deadline, an unfinished job
/// becomes a `Timeout` error; the thread itself is left to the runtime.
pub async fn run_blocking<F>(deadline: Option<Duration>, job: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);

    let joined = match deadline {
        Some(deadline) => tokio::time::timeout(deadline, task).await.map_err(|_| {
            ClusterConfigError::timeout(format!(
                "cluster configuration did not finish within {:?}",
                deadline
            ))
        })?,
        None => task.await,
    };

    joined.map_err(|e| ClusterConfigError::config(format!("Command task failed: {}", e)))?
}

/// Process exit code for a failed command
pub fn exit_code(error: &ClusterConfigError) -> i32 {
    match error {
        ClusterConfigError::Timeout(_) => EXIT_TIMEOUT,
        _ => 1,
    }
}
