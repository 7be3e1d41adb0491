// file: src/logging/logger.rs
// version: 1.3.0
// guid: j0k1l2m3-n4o5-6789-0123-456789jklmno

//! Logger initialization and configuration

use crate::error::ClusterConfigError;
use crate::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `--quiet` and `--verbose` pin the level;
/// otherwise `RUST_LOG` applies, defaulting to `info`. Log lines go to
/// stderr so that rendered configs on stdout stay clean.
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(level_filter(verbose, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| ClusterConfigError::config(format!("Failed to initialize logger: {}", e)))
}

fn level_filter(verbose: bool, quiet: bool) -> EnvFilter {
    match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, true) => EnvFilter::new("debug"),
        (false, false) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }
}

/// Run `f` inside an `operation` span named `operation`
pub fn with_operation_span<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = tracing::info_span!("operation", name = operation);
    let _enter = span.enter();
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice() {
        // Only one global subscriber can exist per process; the second call
        // must fail cleanly rather than panic.
        let _ = init_logger(false, true);
        assert!(init_logger(true, false).is_err());
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(level_filter(true, true).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(level_filter(false, true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_with_operation_span() {
        // Arrange
        let mut executed = false;

        // Act
        let result = with_operation_span("test_operation", || {
            executed = true;
            "test_result"
        });

        // Assert
        assert!(executed);
        assert_eq!(result, "test_result");
    }

    #[test]
    fn test_with_operation_span_propagates_errors() {
        let result: Result<()> =
            with_operation_span("failing", || Err(ClusterConfigError::config("boom")));
        assert!(result.is_err());
    }
}
