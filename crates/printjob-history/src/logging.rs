//! Logging setup.
//!
//! Library code logs through the `log` facade; this installs a
//! `tracing-subscriber` formatter and bridges `log` records into it.

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::LoggingError;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Fails if a logger or subscriber
/// was already installed.
pub fn init_logging(default_filter: &str) -> Result<(), LoggingError> {
    tracing_log::LogTracer::init()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
