//! Tracing subscriber setup
//!
//! The library crates only emit `tracing` events; binaries and tests that
//! want output call [`init_tracing`] once at startup.

use gridsave_domain::{GridSaveError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; `default_filter` (e.g. `"gridsave=debug"`)
/// applies when it is unset or invalid.
///
/// # Errors
/// Returns `GridSaveError::Config` if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    init_tracing_with(default_filter, LogFormat::Text)
}

/// Like [`init_tracing`], choosing the output format.
///
/// # Errors
/// Returns `GridSaveError::Config` if a global subscriber is already set.
pub fn init_tracing_with(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(default_filter);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    installed.map_err(|e| GridSaveError::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
