//! Event handling and state transition logic.
//!
//! This module implements the handler that turns one inbound [`Event`] into
//! session changes and a sequence of [`Action`]s. It owns the behavior shared
//! by every mode, and delegates the rest to the active [`Mode`]:
//!
//! - **`key_press` cancel**: pops a sub-mode or ends the session
//! - **`select_line`**: resolves the identifier to exactly one catalog line
//! - **`delete_line`**: asks the mode, else removes the first match, then
//!   re-emits the catalog
//! - everything else goes to the mode callbacks
//!
//! Every response the handler emits is recorded into the [`Session`] before
//! it is returned, so the session always matches what the host shows. At most
//! one [`Action::Respond`] is produced per event.
//!
//! # Example
//!
//! ```rust
//! use proxy_modes::app::{handle_event, Action, Mode, Session};
//! use proxy_modes::protocol::{Event, LineRef, Response};
//! use proxy_modes::domain::Line;
//!
//! struct Static;
//!
//! impl Mode for Static {
//!     fn name(&self) -> &'static str { "static" }
//!     fn startup(&mut self) -> proxy_modes::Result<Response> {
//!         Ok(Response::with_lines(vec![Line::new("a"), Line::new("b")]))
//!     }
//! }
//!
//! let mut mode = Static;
//! let mut session = Session::new();
//! session.record(&mode.startup()?);
//!
//! let event = Event::DeleteLine(LineRef { id: None, text: Some("a".into()) });
//! let actions = handle_event(&mut session, &mut mode, &event)?;
//! assert_eq!(actions, vec![Action::Respond(Response::with_lines(vec![Line::new("b")]))]);
//! # Ok::<(), proxy_modes::ProxyError>(())
//! ```

use super::modes::{Mode, Reaction};
use super::state::Session;
use super::Action;
use crate::domain::Result;
use crate::protocol::{Event, KeyCode, Response};

/// Processes an event, mutates the session, and returns actions to execute.
///
/// # Errors
///
/// Returns whatever the mode callback reports. Evaluation errors are
/// recoverable; see [`ProxyError::is_recoverable`](crate::ProxyError::is_recoverable).
pub fn handle_event(session: &mut Session, mode: &mut dyn Mode, event: &Event) -> Result<Vec<Action>> {
    let _span = tracing::debug_span!(
        "handle_event",
        mode = mode.name(),
        event = event.kind(),
        depth = session.depth()
    )
    .entered();

    let reaction = match event {
        Event::Input(text) => mode.on_input(session, text)?,
        Event::KeyPress(KeyCode::Cancel) => return Ok(cancel(session)),
        Event::KeyPress(key) => mode.on_key(session, key)?,
        Event::SelectLine(line) => {
            let Some(identifier) = line.identifier() else {
                tracing::debug!("selection without identifier");
                return Ok(vec![]);
            };
            let Some(selected) = session.catalog.resolve(identifier).cloned() else {
                tracing::debug!(identifier = %identifier, "selection does not resolve to a single line");
                return Ok(vec![]);
            };
            mode.on_select(session, &selected)?
        }
        Event::SelectCustomInput(text) => mode.on_custom_input(session, text)?,
        Event::DeleteLine(line) => match line.identifier() {
            Some(identifier) => match mode.on_delete(session, identifier)? {
                Reaction::Ignore => delete(session, identifier),
                reaction => reaction,
            },
            None => Reaction::Respond(Response::with_lines(session.catalog.to_vec())),
        },
    };

    Ok(apply(session, reaction))
}

fn delete(session: &mut Session, identifier: &str) -> Reaction {
    match session.catalog.remove(identifier) {
        Some(removed) => tracing::debug!(identifier = %removed.identifier(), "line deleted"),
        None => tracing::debug!(identifier = %identifier, "nothing to delete"),
    }
    Reaction::Respond(Response::with_lines(session.catalog.to_vec()))
}

fn cancel(session: &mut Session) -> Vec<Action> {
    if session.exits_on_cancel() {
        tracing::debug!("cancel ends the session");
        return vec![Action::Exit];
    }
    session.pop_sub_mode().map_or_else(
        || {
            tracing::debug!("cancel at top level ignored");
            vec![]
        },
        |response| vec![Action::Respond(response)],
    )
}

fn apply(session: &mut Session, reaction: Reaction) -> Vec<Action> {
    match reaction {
        Reaction::Ignore => vec![],
        Reaction::Respond(response) => {
            session.record(&response);
            vec![Action::Respond(response)]
        }
        Reaction::Enter(sub_mode) => vec![Action::Respond(session.push_sub_mode(sub_mode))],
        Reaction::Finish { target, text } => {
            tracing::debug!(target = %target, "finishing with external action");
            vec![Action::Run { target, text }, Action::Exit]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::SubMode;
    use crate::app::Target;
    use crate::domain::{Line, ProxyError};
    use crate::eval::EvalError;
    use crate::protocol::LineRef;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Sample {
        selected: Vec<String>,
    }

    impl Mode for Sample {
        fn name(&self) -> &'static str {
            "sample"
        }

        fn startup(&mut self) -> Result<Response> {
            Ok(Response::with_lines(vec![Line::new("bla"), Line::new("bla bla bla")]))
        }

        fn on_input(&mut self, _session: &Session, text: &str) -> Result<Reaction> {
            match text {
                "sub " => Ok(Reaction::Enter(SubMode::new("sub", vec![Line::new("inner")]))),
                "bad" => Err(EvalError::Empty.into()),
                _ => Ok(Reaction::Ignore),
            }
        }

        fn on_select(&mut self, _session: &Session, line: &Line) -> Result<Reaction> {
            self.selected.push(line.text.clone());
            Ok(Reaction::Finish {
                target: Target::Clipboard,
                text: line.identifier().to_string(),
            })
        }
    }

    fn started() -> (Session, Sample) {
        let mut mode = Sample::default();
        let mut session = Session::new();
        session.record(&mode.startup().unwrap());
        (session, mode)
    }

    fn by_text(text: &str) -> LineRef {
        LineRef {
            id: None,
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn delete_removes_first_match_and_reemits() {
        let (mut session, mut mode) = started();
        let actions = handle_event(&mut session, &mut mode, &Event::DeleteLine(by_text("bla"))).unwrap();
        assert_eq!(
            actions,
            vec![Action::Respond(Response::with_lines(vec![Line::new("bla bla bla")]))]
        );
    }

    #[test]
    fn delete_of_absent_identifier_keeps_catalog() {
        let (mut session, mut mode) = started();
        let before = session.catalog.clone();
        let actions = handle_event(&mut session, &mut mode, &Event::DeleteLine(by_text("nope"))).unwrap();
        assert_eq!(actions, vec![Action::Respond(Response::with_lines(before.to_vec()))]);
        assert_eq!(session.catalog, before);
    }

    #[test]
    fn select_runs_once_and_exits() {
        let (mut session, mut mode) = started();
        let actions = handle_event(&mut session, &mut mode, &Event::SelectLine(by_text("bla"))).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Run {
                    target: Target::Clipboard,
                    text: "bla".to_string()
                },
                Action::Exit
            ]
        );
        assert_eq!(mode.selected, vec!["bla"]);
    }

    #[test]
    fn unresolved_selection_is_a_no_op() {
        let (mut session, mut mode) = started();
        let event = Event::SelectLine(LineRef { id: None, text: None });
        assert!(handle_event(&mut session, &mut mode, &event).unwrap().is_empty());
        let event = Event::SelectLine(by_text("missing"));
        assert!(handle_event(&mut session, &mut mode, &event).unwrap().is_empty());
        assert!(mode.selected.is_empty());
    }

    #[test]
    fn cancel_pops_then_exits() {
        let (mut session, mut mode) = started();
        let before = session.catalog.clone();
        handle_event(&mut session, &mut mode, &Event::Input("sub ".into())).unwrap();
        assert_eq!(session.active_sub_mode(), Some("sub"));

        let cancel = Event::KeyPress(KeyCode::Cancel);
        let actions = handle_event(&mut session, &mut mode, &cancel).unwrap();
        assert!(matches!(&actions[..], [Action::Respond(r)] if r.lines.as_deref() == Some(before.as_slice())));
        assert_eq!(session.catalog, before);

        let actions = handle_event(&mut session, &mut mode, &cancel).unwrap();
        assert_eq!(actions, vec![Action::Exit]);
    }

    #[test]
    fn cancel_at_top_level_without_exit_is_ignored() {
        let (mut session, mut mode) = started();
        session.record(&Response::new().exit_by_cancel(false));
        let actions = handle_event(&mut session, &mut mode, &Event::KeyPress(KeyCode::Cancel)).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn mode_errors_propagate() {
        let (mut session, mut mode) = started();
        let err = handle_event(&mut session, &mut mode, &Event::Input("bad".into())).unwrap_err();
        assert!(matches!(err, ProxyError::Eval(EvalError::Empty)));
        assert!(err.is_recoverable());
    }
}
