//! Shared logging setup for hosts embedding the collector.
//!
//! Provides a consistent `tracing` configuration so discovery, metrics, and
//! sampling operations log uniformly regardless of the embedding binary.

use crate::Result;

/// Initializes structured logging based on verbosity level.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
///
/// # Errors
/// Returns a configuration error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .try_init()
        .map_err(|e| {
            crate::error::SupplyError::configuration(format!("failed to initialize logging: {e}"))
        })?;

    Ok(())
}

/// Maps verbosity flags to a maximum log level. Quiet wins over verbose.
fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    // Logging can only be initialized once per test process, so only the
    // level-selection logic is exercised here.
    use super::level_for;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0, true), tracing::Level::ERROR);
        assert_eq!(level_for(3, true), tracing::Level::ERROR);
        assert_eq!(level_for(0, false), tracing::Level::INFO);
        assert_eq!(level_for(1, false), tracing::Level::DEBUG);
        assert_eq!(level_for(2, false), tracing::Level::TRACE);
    }
}
