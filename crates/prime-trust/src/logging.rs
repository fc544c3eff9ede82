//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured filter is used, raised
//! to `debug` for this crate when `debug` is on.

use crate::config::TrustConfig;
use crate::error::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(config: &TrustConfig) -> String {
    if config.debug {
        format!("{},prime_trust=debug", config.log_filter)
    } else {
        config.log_filter.clone()
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(config: &TrustConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config)))
        .map_err(|e| Error::config(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| Error::Internal(format!("Logging already initialized: {}", e)))
}
