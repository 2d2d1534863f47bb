//! Tracing subscriber setup.
//!
//! Log lines go to stderr so command output on stdout stays clean for
//! piping. The filter comes from `OPSDESK_LOG`, then `log-level` in the
//! config, then `warn`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const LOG_ENV: &str = "OPSDESK_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .ok()
        .or_else(|| config.log_level.as_deref().and_then(|l| EnvFilter::try_new(l).ok()))
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
