//! Path resolution for the log and configuration files.
//!
//! Base directories come from [`dirs`], which follows the XDG layout on Linux
//! (`$XDG_DATA_HOME`, `$XDG_CONFIG_HOME`, falling back below `$HOME`).

use std::path::{Path, PathBuf};

const APP_DIR: &str = "rofi";
const LOG_FILE: &str = "proxy-modes.log";
const CONFIG_FILE: &str = "proxy-modes.toml";

/// Default log file, `<data dir>/rofi/proxy-modes.log`.
#[must_use]
pub fn default_log_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE))
}

/// Default configuration file, `<config dir>/rofi/proxy-modes.toml`.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, or a tilde when no home directory is known, are
/// returned as given.
///
/// # Examples
///
/// ```
/// use proxy_modes::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/log/x.log"), PathBuf::from("/var/log/x.log"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_in(dirs::home_dir().as_deref(), path)
}

fn expand_tilde_in(home: Option<&Path>, path: &str) -> PathBuf {
    let rest = match path {
        "~" => "",
        _ => match path.strip_prefix("~/") {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
    };
    home.map_or_else(|| PathBuf::from(path), |home| home.join(rest))
}
