//! Log output setup.
//!
//! The crate only emits `tracing` events; binaries and tests decide where they go.
//! [`init_tracing`] installs a formatted subscriber filtered by `RUST_LOG`
//! (default `info`).

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// Calling it again, or after another subscriber was installed, does nothing.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(true)
    .try_init();
}
