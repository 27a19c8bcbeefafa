//! Tracing bootstrap for binaries and integration harnesses.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global tracing subscriber honoring `RUST_LOG`.
///
/// Falls back to `info` when no filter is set. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
