//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ConfigError;

/// Install a global fmt subscriber filtered by `filter`.
///
/// Returns `Ok(false)` when a global subscriber was already installed, which
/// happens when a host application or an earlier call set one up.
pub fn init_tracing(filter: &str) -> Result<bool, ConfigError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| ConfigError::InvalidLogFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })?;

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        Ok(()) => Ok(true),
        Err(e) if tracing::dispatcher::has_been_set() => {
            tracing::debug!(error = %e, "tracing subscriber already installed");
            Ok(false)
        }
        Err(e) => Err(ConfigError::Subscriber(e.to_string())),
    }
}
