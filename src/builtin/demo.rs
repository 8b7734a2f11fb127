//! Small demonstration modes: custom keys, line flags, todo list, unicode.

use crate::app::{Mode, Reaction, Session};
use crate::domain::{Line, Result};
use crate::protocol::{KeyCode, Response};
use std::io::Write;

/// Reports which custom key was pressed.
#[derive(Debug, Default)]
pub struct Keys;

impl Mode for Keys {
    fn name(&self) -> &'static str {
        "keys"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::new().with_help(
            r#"Press <span foreground="red">Alt+1</span> or <span foreground="red">Alt+2</span>"#,
        ))
    }

    fn on_key(&mut self, _session: &Session, key: &KeyCode) -> Result<Reaction> {
        let text = match key {
            KeyCode::Custom(n @ 1..=10) => format!("You press Alt+{}", n % 10),
            _ => "You press unknown key".to_string(),
        };
        Ok(Reaction::Respond(Response::with_lines(vec![Line::new(text).filterable(false)])))
    }
}

/// Shows one line per emphasis flag.
#[derive(Debug, Default)]
pub struct Lines;

impl Mode for Lines {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::with_lines(vec![
            Line::new("normal").filterable(false),
            Line::new("urgent").filterable(false).urgent(true),
            Line::new("active").filterable(false).active(true),
            Line::new("with icon").filterable(false).with_icon("applications-internet"),
        ]))
    }
}

/// A list the user grows with free text and shrinks with delete.
///
/// The entries live in the mode, so a cleared host view does not lose them.
#[derive(Debug, Default)]
pub struct Todo {
    entries: Vec<Line>,
}

impl Todo {
    fn view(&self) -> Reaction {
        Reaction::Respond(Response::with_lines(self.entries.clone()))
    }
}

impl Mode for Todo {
    fn name(&self) -> &'static str {
        "todo"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::new().with_help("Press Enter to add text\rPress Shift+Delete to remove the line"))
    }

    fn on_custom_input(&mut self, _session: &Session, text: &str) -> Result<Reaction> {
        if text.is_empty() {
            return Ok(Reaction::Ignore);
        }
        self.entries.push(Line::new(text));
        Ok(self.view())
    }

    fn on_delete(&mut self, _session: &Session, identifier: &str) -> Result<Reaction> {
        if let Some(index) = self.entries.iter().position(|line| line.identifier() == identifier) {
            self.entries.remove(index);
        }
        Ok(self.view())
    }
}

/// Shows non-ASCII text and echoes every input to a side channel.
#[derive(Debug)]
pub struct Unicode<W> {
    echo: W,
}

impl<W: Write> Unicode<W> {
    pub const fn new(echo: W) -> Self {
        Self { echo }
    }
}

impl<W: Write> Mode for Unicode<W> {
    fn name(&self) -> &'static str {
        "unicode"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::with_lines(vec![
            Line::new("HelloПриветPërshëndetje").filterable(false)
        ]))
    }

    fn on_input(&mut self, _session: &Session, text: &str) -> Result<Reaction> {
        writeln!(self.echo, "{text}")?;
        self.echo.flush()?;
        Ok(Reaction::Ignore)
    }
}
