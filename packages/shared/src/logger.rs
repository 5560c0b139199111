//! Logging setup utilities for the Dojo binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default level applies to the calling crate; it can be overridden
/// at runtime with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The name of the calling crate (e.g., "dojo-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use dojo_shared::logger::setup_logger;
///
/// setup_logger("dojo-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={}",
                    crate_name.replace("-", "_"),
                    default_log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(
        "Logger initialized for '{}' with default level '{}'",
        crate_name,
        default_log_level
    );
}
