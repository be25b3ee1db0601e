//! Logging configuration for the explorer.
//!
//! Logs go to stderr so the table output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging with an env-filter (RUST_LOG) override.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
