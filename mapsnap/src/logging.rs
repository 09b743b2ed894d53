//! Logging setup for binaries and tests embedding the renderer.
//!
//! The library itself only emits `tracing` events. Installing a subscriber
//! is left to the host; [`init_logging`] is a convenience for hosts that
//! have none.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "mapsnap=info";

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_filter`.
///
/// Returns `false` if a global subscriber was already installed, so it is
/// safe to call more than once.
pub fn init_logging(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
