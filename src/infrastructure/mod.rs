//! Infrastructure layer for filesystem, environment and process interactions.
//!
//! - [`paths`]: XDG locations of the log and configuration files
//! - [`command`]: external commands exposed as [`ExternalAction`] and
//!   [`LineSource`] capabilities

pub mod command;
pub mod paths;

pub use command::{CommandAction, Delivery, ExternalAction, LineSource, ProcessList};
pub use paths::{default_config_file, default_log_file, expand_tilde};
