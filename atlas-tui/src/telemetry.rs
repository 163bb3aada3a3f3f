//! Structured logging.
//!
//! The terminal belongs to the UI, so events are written as JSON lines to the
//! configured log file instead of stderr.

use crate::error::TuiError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_FILTER_ENV: &str = "ATLAS_LOG";
pub const DEFAULT_LOG_FILTER: &str = "atlas_tui=info";

pub fn init_logging(log_path: &Path) -> Result<(), TuiError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(log_path = %log_path.display(), "Logging initialized");
    Ok(())
}
