//! Combi-style mode with nested `kill` and `clipboard` sub-modes.
//!
//! Typing a sub-mode name followed by a space, or selecting its line, enters
//! it. Cancel returns to the top level. Selecting inside a sub-mode runs the
//! matching capability and ends the session.

use crate::app::{Mode, Reaction, Session, SubMode, Target};
use crate::domain::{Line, Result};
use crate::infrastructure::LineSource;
use crate::protocol::Response;

const KILL: &str = "kill";
const CLIPBOARD: &str = "clipboard";
const PROMPT: &str = "combi";
const HELP: &str = r#"Press <span foreground="red">ESCAPE</span> for exit from mode"#;

pub struct SubModes {
    processes: Box<dyn LineSource>,
    snippets: Vec<String>,
}

impl SubModes {
    /// `processes` feeds the `kill` sub-mode, `snippets` the `clipboard` one.
    #[must_use]
    pub fn new(processes: Box<dyn LineSource>, snippets: Vec<String>) -> Self {
        Self { processes, snippets }
    }

    fn enter(&self, name: &str) -> Result<Reaction> {
        let lines = if name == KILL {
            self.processes.lines()?
        } else {
            self.snippets.iter().map(Line::new).collect()
        };
        Ok(Reaction::Enter(SubMode::new(name, lines).with_help(HELP)))
    }
}

impl Mode for SubModes {
    fn name(&self) -> &'static str {
        "sub-modes"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::with_lines(vec![Line::new(KILL), Line::new(CLIPBOARD)]).with_prompt(PROMPT))
    }

    fn on_input(&mut self, session: &Session, text: &str) -> Result<Reaction> {
        if session.active_sub_mode().is_some() {
            return Ok(Reaction::Ignore);
        }
        match text.strip_suffix(' ') {
            Some(name @ (KILL | CLIPBOARD)) => self.enter(name),
            _ => Ok(Reaction::Ignore),
        }
    }

    fn on_select(&mut self, session: &Session, line: &Line) -> Result<Reaction> {
        let text = line.identifier().to_string();
        match session.active_sub_mode() {
            None if text == KILL || text == CLIPBOARD => self.enter(&text),
            Some(KILL) => Ok(Reaction::Finish {
                target: Target::Kill,
                text,
            }),
            Some(CLIPBOARD) => Ok(Reaction::Finish {
                target: Target::Clipboard,
                text,
            }),
            _ => Ok(Reaction::Ignore),
        }
    }
}

impl std::fmt::Debug for SubModes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubModes")
            .field("snippets", &self.snippets)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handle_event;
    use crate::protocol::{Event, KeyCode, LineRef};
    use crate::app::Action;
    use pretty_assertions::assert_eq;

    struct Fixed;

    impl LineSource for Fixed {
        fn lines(&self) -> Result<Vec<Line>> {
            Ok(vec![Line::new("bash (7)").with_id("7")])
        }
    }

    fn started() -> (Session, SubModes) {
        let mut mode = SubModes::new(Box::new(Fixed), vec!["bla".into(), "bla bla bla".into()]);
        let mut session = Session::new();
        session.record(&mode.startup().unwrap());
        (session, mode)
    }

    #[test]
    fn typing_trigger_enters_sub_mode() {
        let (mut session, mut mode) = started();
        let actions = handle_event(&mut session, &mut mode, &Event::Input("kill ".into())).unwrap();
        assert_eq!(
            actions,
            vec![Action::Respond(
                Response::with_lines(vec![Line::new("bash (7)").with_id("7")])
                    .with_input("")
                    .with_prompt("kill")
                    .with_help(HELP)
                    .hide_combi_lines(true)
                    .exit_by_cancel(false)
            )]
        );

        let actions = handle_event(&mut session, &mut mode, &Event::Input("kill".into())).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn other_input_filters_silently() {
        let (mut session, mut mode) = started();
        let actions = handle_event(&mut session, &mut mode, &Event::Input("cl".into())).unwrap();
        assert!(actions.is_empty());
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn selecting_snippet_copies_and_exits() {
        let (mut session, mut mode) = started();
        let select = |text: &str| {
            Event::SelectLine(LineRef {
                id: None,
                text: Some(text.to_string()),
            })
        };
        handle_event(&mut session, &mut mode, &select("clipboard")).unwrap();
        assert_eq!(session.active_sub_mode(), Some("clipboard"));

        let actions = handle_event(&mut session, &mut mode, &select("bla bla bla")).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Run {
                    target: Target::Clipboard,
                    text: "bla bla bla".to_string()
                },
                Action::Exit
            ]
        );
    }

    #[test]
    fn cancel_returns_to_combi() {
        let (mut session, mut mode) = started();
        handle_event(&mut session, &mut mode, &Event::Input("clipboard ".into())).unwrap();
        let actions = handle_event(&mut session, &mut mode, &Event::KeyPress(KeyCode::Cancel)).unwrap();
        let [Action::Respond(response)] = &actions[..] else {
            panic!("expected one response");
        };
        assert_eq!(response.prompt.as_deref(), Some("combi"));
        assert_eq!(response.lines.as_ref().map(Vec::len), Some(2));
        assert_eq!(session.active_sub_mode(), None);
    }
}
