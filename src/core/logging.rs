//! Logging Setup
//!
//! Tracing subscriber initialization for the binary. Library consumers
//! install their own subscriber; nothing here runs implicitly.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a compact stderr subscriber honoring `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
