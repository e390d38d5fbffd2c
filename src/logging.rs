//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI, so all log output goes to a file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::APP_DIR_NAME;

/// `<data_dir>/snapshot-diff-tui/sdiff.log`, or the temp dir when the
/// platform has no data dir.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join("sdiff.log")
}

/// `RUST_LOG` when set, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber writing to `log_file_path`.
pub fn init_global(log_file_path: &Path, default_level: &str) -> std::io::Result<()> {
    if let Some(parent) = log_file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    build_subscriber(log_file, env_filter(default_level))
        .try_init()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!(path = %log_file_path.display(), "logging initialised");
    Ok(())
}

/// Subscriber shared between the binary and tests.
pub fn build_subscriber(log_file: File, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}
