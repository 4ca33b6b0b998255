//! Diagnostics for the launcher itself
//!
//! Only bootstrap progress and failures go through tracing, always to stderr.
//! The task's own output is never routed here.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "ANALYTICS_LAUNCHER_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing. Call once at process startup; later calls are no-ops.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();
}
