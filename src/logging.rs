//! Tracing subscriber setup.
//!
//! Verbosity follows `RUST_LOG` when set, otherwise the supplied default.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging at the default `info` level.
pub fn init() {
    init_with_filter("info");
}

/// Initialize logging with an explicit default filter.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
