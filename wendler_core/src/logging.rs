//! Logging infrastructure.
//!
//! Centralized tracing setup shared by the binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with sensible defaults.
///
/// Environment-based filtering via RUST_LOG, compact format. The default
/// level is INFO.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level, still overridable by
/// the RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
