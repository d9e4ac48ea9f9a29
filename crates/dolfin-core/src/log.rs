//! Logging setup for dolfin tools.
//!
//! Events go to stderr so command output on stdout stays machine-readable.
//! The filter is read from `RUST_LOG`, falling back to the given default.

use dolfin_types::{DolfinError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "dolfin=info";

/// Initialize the logging system with default configuration.
pub fn init_default() -> Result<()> {
    init_with_filter(DEFAULT_FILTER)
}

/// Initialize logging, using `default_filter` when `RUST_LOG` is unset.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_with_filter(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| DolfinError::Other(format!("Failed to initialize logging: {}", e)))
}
