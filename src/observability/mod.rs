//! Structured logging to a rotating file.
//!
//! Stdout is the protocol channel and stderr belongs to the host, so every
//! `tracing` event is formatted by a `tracing-subscriber` fmt layer and written
//! to a log file instead.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → Mutex<FileWriter> → proxy-modes.log
//! ```
//!
//! # Features
//!
//! - **File Location**: `$XDG_DATA_HOME/rofi/proxy-modes.log` unless configured
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `--trace-level` on the command line
//! 3. `trace_level` in the configuration file
//! 4. Default: `"info"`
//!
//! # Usage
//!
//! ```rust
//! use proxy_modes::observability::init_tracing;
//! use proxy_modes::Config;
//!
//! let config = Config {
//!     log_file: Some(std::env::temp_dir().join("proxy-modes-doc.log").display().to_string()),
//!     ..Config::default()
//! };
//! init_tracing(&config);
//!
//! tracing::debug!("plugin initialized");
//! ```

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
