//! Logging initialization.
//!
//! Diagnostics go to stderr so they never mix with command output on stdout
//! (shell widgets read `kwik suggest --plain` line by line). The level is
//! taken from `KWIK_LOG`, then `RUST_LOG`, defaulting to `warn`:
//!
//! ```bash
//! KWIK_LOG=debug kwik suggest "git"
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV_VAR: &str = "KWIK_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global stderr subscriber. Safe to call more than once.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second init (tests) returns Err; keep the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}
