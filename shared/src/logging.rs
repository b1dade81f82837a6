//! Structured logging init, mirroring the `tracing_subscriber::fmt()`
//! setup the teacher repeats at each binary's entry point (see
//! `solver::http_solver`'s test harness) rather than the `tracing-setup`
//! crate's now-stale `tracing-subscriber 0.2` pin.

/// Initializes a global `tracing` subscriber reading its filter directives
/// from `filter` (falling back to `env_filter` if set, e.g. `RUST_LOG`).
/// Safe to call once per process; a second call is a no-op error that
/// callers are expected to ignore.
pub fn init(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .try_init();
}
