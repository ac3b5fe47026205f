//! Diagnostics go to a log file: the terminal belongs to the TUI.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};
use crate::error::{Error, Result};

/// Install the global subscriber. Returns the file being written, or `None`
/// when no log location could be determined.
pub fn init(settings: &LoggingSettings) -> Result<Option<PathBuf>> {
    let Some(path) = settings.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let directives = filter_directives(env::var("RUST_LOG").ok(), &settings.filter);
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| Error::InvalidConfig(format!("logging.filter {directives:?}: {e}")))?;

    // Already installed (tests, or a second call) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(Some(path))
}

/// `RUST_LOG` wins over the configured filter when it is set and non-empty.
fn filter_directives(from_env: Option<String>, configured: &str) -> String {
    match from_env {
        Some(value) if !value.trim().is_empty() => value,
        _ => configured.to_string(),
    }
}
