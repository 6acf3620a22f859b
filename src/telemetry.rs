//! Tracing bootstrap for tests and embedding applications.
//!
//! Lock transitions emit `trace`-level events (acquisitions, releases, wait
//! edges). They are invisible until a subscriber is installed; embedding
//! applications normally install their own.

use tracing_subscriber::EnvFilter;

/// Installs an env-filtered `fmt` subscriber unless one is already set.
///
/// Filtering follows `RUST_LOG`, defaulting to `info` so the lock's own
/// trace events stay quiet unless explicitly requested.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
