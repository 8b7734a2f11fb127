//! Actions representing side effects to be executed by the event loop.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! loop executes them in order: responses are written to the host, commands
//! are run through the injected capabilities, and [`Action::Exit`] stops the
//! loop without reading further input.
//!
//! # Example
//!
//! ```rust
//! use proxy_modes::app::{Action, Target};
//!
//! let actions = vec![
//!     Action::Run { target: Target::Clipboard, text: "4".to_string() },
//!     Action::Exit,
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::protocol::Response;
use std::fmt;

/// External capability a mode can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Copy text to the system clipboard.
    Clipboard,
    /// Signal a process by identifier.
    Kill,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clipboard => "clipboard",
            Self::Kill => "kill",
        })
    }
}

/// Commands representing side effects to be executed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Writes one response line to the host.
    Respond(Response),

    /// Runs an external command with `text` as its payload.
    ///
    /// A failure here is fatal for the process.
    Run {
        /// Capability to invoke.
        target: Target,
        /// Text handed to the command as-is.
        text: String,
    },

    /// Ends the session. Nothing is read or written afterwards.
    Exit,
}
