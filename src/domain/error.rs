//! Error types for the proxy mode engine.
//!
//! This module defines the centralized error type [`ProxyError`] and a type alias
//! [`Result`] used throughout the crate. Inbound decoding and expression
//! evaluation have their own narrower error enums ([`DecodeError`] and
//! [`EvalError`]) which convert into `ProxyError` at the session boundary.
//!
//! [`DecodeError`]: crate::protocol::DecodeError
//! [`EvalError`]: crate::eval::EvalError

use std::time::Duration;
use thiserror::Error;

/// The main error type for proxy mode operations.
///
/// Per-event failures (decode, evaluation) are recovered by the event loop;
/// command failures and outbound I/O errors end the process with a failure
/// status.
///
/// # Examples
///
/// ```
/// use proxy_modes::ProxyError;
///
/// fn require_command(argv: &[String]) -> Result<(), ProxyError> {
///     if argv.is_empty() {
///         return Err(ProxyError::Config("command must not be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(require_command(&[]).is_err());
/// ```
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Filesystem or stream I/O failed.
    ///
    /// Wraps errors from standard library I/O operations, including writes to
    /// the outbound protocol stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON value could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The inbound message could not be decoded into an event.
    #[error("Decode error: {0}")]
    Decode(#[from] crate::protocol::DecodeError),

    /// A mode-specific computation failed.
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::eval::EvalError),

    /// An external command could not be spawned.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully.
    ///
    /// `code` is `None` when the command was terminated by a signal.
    #[error("`{program}` exited with status {code:?}")]
    Command {
        /// Program that failed.
        program: String,
        /// Exit code, if any.
        code: Option<i32>,
    },

    /// An external command did not finish within the configured timeout.
    #[error("`{program}` timed out after {timeout:?}")]
    CommandTimeout {
        /// Program that was killed.
        program: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl ProxyError {
    /// Whether the event loop answers this error with an empty list and keeps
    /// running. Everything else ends the process.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Eval(_))
    }
}

/// A specialized `Result` type for proxy mode operations.
pub type Result<T> = std::result::Result<T, ProxyError>;
