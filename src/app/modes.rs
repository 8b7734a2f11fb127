//! The [`Mode`] trait implemented by every plugin behavior.
//!
//! A mode only decides *what* should happen; it never writes to the host or
//! runs commands itself. Each callback returns a [`Reaction`] which the event
//! handler turns into [`Action`](super::Action)s and folds into the
//! [`Session`].
//!
//! Callbacks receive the session read-only so a mode can look at the active
//! sub-mode or the current catalog. Generic behavior (cancel, deletion,
//! identifier resolution) is handled before a mode is consulted.

use super::actions::Target;
use super::state::Session;
use crate::domain::{Line, Result};
use crate::protocol::{KeyCode, Response};

/// What a mode wants done in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// No outbound message.
    Ignore,
    /// Send a response.
    Respond(Response),
    /// Push a sub-mode and show it.
    Enter(SubMode),
    /// Run an external action with `text`, then end the session.
    Finish {
        /// Capability to invoke.
        target: Target,
        /// Payload handed to the command.
        text: String,
    },
}

/// A nested mode pushed during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMode {
    pub name: String,
    pub lines: Vec<Line>,
    pub prompt: String,
    pub help: Option<String>,
    pub hide_combi_lines: bool,
    pub exit_by_cancel: bool,
}

impl SubMode {
    /// A sub-mode prompted with its own name that hides the combi list and
    /// is left with cancel.
    #[must_use]
    pub fn new(name: impl Into<String>, lines: Vec<Line>) -> Self {
        let name = name.into();
        Self {
            prompt: name.clone(),
            name,
            lines,
            help: None,
            hide_combi_lines: true,
            exit_by_cancel: false,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// Behavior profile selected at launch.
///
/// Every callback except [`Mode::startup`] defaults to [`Reaction::Ignore`].
pub trait Mode {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// The message sent before any input is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial view cannot be built.
    fn startup(&mut self) -> Result<Response>;

    /// The host input field changed.
    ///
    /// # Errors
    ///
    /// Evaluation failures are recovered by the event loop.
    fn on_input(&mut self, session: &Session, text: &str) -> Result<Reaction> {
        let _ = (session, text);
        Ok(Reaction::Ignore)
    }

    /// A key other than cancel was pressed.
    ///
    /// # Errors
    ///
    /// Implementations may fail like [`Mode::on_input`].
    fn on_key(&mut self, session: &Session, key: &KeyCode) -> Result<Reaction> {
        let _ = (session, key);
        Ok(Reaction::Ignore)
    }

    /// A catalog line was selected. `line` is the unique match.
    ///
    /// # Errors
    ///
    /// Implementations may fail like [`Mode::on_input`].
    fn on_select(&mut self, session: &Session, line: &Line) -> Result<Reaction> {
        let _ = (session, line);
        Ok(Reaction::Ignore)
    }

    /// Free text was submitted.
    ///
    /// # Errors
    ///
    /// Implementations may fail like [`Mode::on_input`].
    fn on_custom_input(&mut self, session: &Session, text: &str) -> Result<Reaction> {
        let _ = (session, text);
        Ok(Reaction::Ignore)
    }

    /// A line was deleted by identifier.
    ///
    /// Modes that keep their own list answer with the full remaining list.
    /// [`Reaction::Ignore`] removes the first catalog match instead.
    ///
    /// # Errors
    ///
    /// Implementations may fail like [`Mode::on_input`].
    fn on_delete(&mut self, session: &Session, identifier: &str) -> Result<Reaction> {
        let _ = (session, identifier);
        Ok(Reaction::Ignore)
    }
}
