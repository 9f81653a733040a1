//! Internal diagnostics setup.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging with tracing-subscriber.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the
/// provided level. Output goes to stderr: stdout belongs to the
/// protocol stream, and a single stray diagnostic line there would
/// corrupt it. Orchestrator-visible logging goes through
/// [`MessageTracker::log`](crate::tracker::MessageTracker::log) instead.
pub fn init(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // try_init: repeated calls (tests, embedding) keep the first setup.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
