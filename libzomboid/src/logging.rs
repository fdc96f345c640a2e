use tracing_subscriber::{fmt, EnvFilter};

/// Initialise global tracing subscriber.
///
/// Reads `RUST_LOG` for filtering, falls back to `warn` so the normal
/// report on stdout stays uncluttered. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout is reserved for user-facing reports; diagnostics go to stderr.
    let _ = fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
