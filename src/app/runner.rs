//! The event loop.
//!
//! [`run`] sends the mode's startup message, then reads one event at a time,
//! hands it to [`handle_event`] and executes the resulting actions before the
//! next line is read.
//!
//! ```text
//! stdin ─▶ Transport::read_event ─▶ handle_event ─▶ [Action]
//!                                                    │
//!            ┌───────────────────────────────────────┤
//!            ▼                    ▼                  ▼
//!   Transport::write_response   Effects::run       Exit
//!        (stdout)             (clipboard, kill)
//! ```
//!
//! Recoverable errors (undecodable lines, failed evaluations) clear the host
//! list and the loop continues. Command failures and I/O errors on the
//! protocol streams end the loop with an error.

use super::actions::{Action, Target};
use super::handler::handle_event;
use super::modes::Mode;
use super::state::Session;
use crate::domain::Result;
use crate::infrastructure::ExternalAction;
use crate::protocol::Response;
use crate::transport::{Inbound, Transport};
use std::io::{BufRead, Write};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The mode or a cancel ended the session.
    Requested,
    /// The host closed the inbound stream.
    StreamClosed,
}

/// Capabilities available to [`Action::Run`].
pub struct Effects {
    clipboard: Box<dyn ExternalAction>,
    kill: Box<dyn ExternalAction>,
}

impl Effects {
    #[must_use]
    pub fn new(clipboard: Box<dyn ExternalAction>, kill: Box<dyn ExternalAction>) -> Self {
        Self { clipboard, kill }
    }

    /// Runs the capability for `target`.
    ///
    /// # Errors
    ///
    /// Propagates the capability's failure.
    pub fn run(&self, target: Target, text: &str) -> Result<()> {
        let _span = tracing::debug_span!("effect", target = %target).entered();
        match target {
            Target::Clipboard => self.clipboard.execute(text),
            Target::Kill => self.kill.execute(text),
        }
    }
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effects").finish_non_exhaustive()
    }
}

/// Runs `mode` over `transport` until the session ends.
///
/// # Errors
///
/// Returns an error when the protocol streams fail, the startup message cannot
/// be built, or an external command fails.
pub fn run<R: BufRead, W: Write>(
    mode: &mut dyn Mode,
    transport: &mut Transport<R, W>,
    effects: &Effects,
) -> Result<Shutdown> {
    let _span = tracing::info_span!("session", mode = mode.name()).entered();
    let mut session = Session::new();

    let greeting = mode.startup()?;
    session.record(&greeting);
    transport.write_response(&greeting)?;
    tracing::info!("startup message sent");

    loop {
        let event = match transport.read_event()? {
            Inbound::Event(event) => event,
            Inbound::Invalid(e) if e.is_malformed() => {
                tracing::warn!(error = %e, "malformed message");
                recover(&mut session, transport)?;
                continue;
            }
            Inbound::Invalid(e) => {
                tracing::debug!(error = %e, "ignoring message");
                continue;
            }
            Inbound::Closed => {
                tracing::info!("host closed the stream");
                return Ok(Shutdown::StreamClosed);
            }
        };

        let actions = match handle_event(&mut session, mode, &event) {
            Ok(actions) => actions,
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, event = event.kind(), "event failed");
                recover(&mut session, transport)?;
                continue;
            }
            Err(e) => return Err(e),
        };

        for action in actions {
            match action {
                Action::Respond(response) => transport.write_response(&response)?,
                Action::Run { target, text } => effects.run(target, &text)?,
                Action::Exit => {
                    tracing::info!("session finished");
                    return Ok(Shutdown::Requested);
                }
            }
        }
    }
}

fn recover<R: BufRead, W: Write>(session: &mut Session, transport: &mut Transport<R, W>) -> Result<()> {
    let response = Response::empty();
    session.record(&response);
    transport.write_response(&response)
}
