//! Logging setup for binaries embedding the client.
//!
//! Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
//! wins over the configured level when set.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter: `RUST_LOG` if set and valid, else `level`, else `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// `log_json` switches to one JSON object per line. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_tracing(level: &str, log_json: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(level));
    let result = if log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("Tracing already initialised");
    }
}
