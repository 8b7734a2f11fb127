//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::infrastructure::paths;
use crate::Config;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber writing to the rotating log file.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` if set and valid
/// 2. `config.trace_level` (the binary folds `--trace-level` into it)
/// 3. Default: `"info"`
///
/// # File Location
///
/// `config.log_file` (with `~` expanded) or
/// `$XDG_DATA_HOME/rofi/proxy-modes.log`.
///
/// # Initialization Behavior
///
/// - Creates the log directory if it doesn't exist
/// - Silently does nothing if the file cannot be opened (logging is optional)
/// - Idempotent: only the first successful call installs a subscriber
///
/// Returns the log file path when logging is active.
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let path = config
        .log_file
        .as_deref()
        .map(paths::expand_tilde)
        .or_else(paths::default_log_file)?;
    let writer = FileWriter::open(path).ok()?;
    let path = writer.path().to_path_buf();

    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()?;

    Some(path)
}
