//! Tracing subscriber setup for binaries and demos

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a formatted subscriber. `RUST_LOG` takes precedence over
/// `log_level`. Does nothing if a global subscriber is already set.
pub fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .try_init();

    if let Err(err) = result {
        tracing::debug!(%err, "tracing subscriber already installed");
    }
}
