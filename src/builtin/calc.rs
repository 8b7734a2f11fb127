//! Calculators: evaluate the input line and offer the result.

use crate::app::{Mode, Reaction, Session, Target};
use crate::domain::{Line, Result};
use crate::eval::{Arithmetic, Evaluator};
use crate::protocol::Response;

const COPY_HINT: &str = "Enter to copy to the clipboard";

/// Math calculator shown in the host's `calc` overlay.
///
/// The result line renders `EXPR = VALUE` in markup and is identified by the
/// bare value, which is what gets copied on selection.
#[derive(Debug)]
pub struct Calc<E = Arithmetic> {
    evaluator: E,
}

impl Calc {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_evaluator(Arithmetic::math())
    }
}

impl Default for Calc {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> Calc<E> {
    pub const fn with_evaluator(evaluator: E) -> Self {
        Self { evaluator }
    }
}

impl<E: Evaluator> Mode for Calc<E> {
    fn name(&self) -> &'static str {
        "calc"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::new().with_overlay("calc"))
    }

    fn on_input(&mut self, _session: &Session, text: &str) -> Result<Reaction> {
        if text.is_empty() {
            return Ok(Reaction::Respond(Response::empty()));
        }

        let value = self.evaluator.evaluate(text)?;
        tracing::debug!(expression = %text, value = %value, "evaluated");

        let line = Line::new(format!(
            r#"<span foreground="red">{text} = {value}</span> <span size="smaller">({COPY_HINT})</span>"#
        ))
        .with_id(value.to_string())
        .filterable(false)
        .markup(true);
        Ok(Reaction::Respond(Response::with_lines(vec![line])))
    }

    fn on_select(&mut self, _session: &Session, line: &Line) -> Result<Reaction> {
        Ok(Reaction::Finish {
            target: Target::Clipboard,
            text: line.identifier().to_string(),
        })
    }
}

/// Plain calculator with builtin functions where `^` is integer xor.
#[derive(Debug)]
pub struct SimpleCalc<E = Arithmetic> {
    evaluator: E,
}

impl SimpleCalc {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_evaluator(Arithmetic::builtins())
    }
}

impl Default for SimpleCalc {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> SimpleCalc<E> {
    pub const fn with_evaluator(evaluator: E) -> Self {
        Self { evaluator }
    }
}

impl<E: Evaluator> Mode for SimpleCalc<E> {
    fn name(&self) -> &'static str {
        "simple-calc"
    }

    fn startup(&mut self) -> Result<Response> {
        Ok(Response::empty())
    }

    fn on_input(&mut self, _session: &Session, text: &str) -> Result<Reaction> {
        let value = self.evaluator.evaluate(text)?;
        let line = Line::new(value.to_string()).filterable(false);
        Ok(Reaction::Respond(Response::with_lines(vec![line])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProxyError;
    use crate::eval::EvalError;
    use pretty_assertions::assert_eq;

    fn respond(reaction: Reaction) -> Response {
        match reaction {
            Reaction::Respond(response) => response,
            other => panic!("expected a response, got {other:?}"),
        }
    }

    #[test]
    fn calc_starts_in_overlay() {
        assert_eq!(
            serde_json::to_string(&Calc::new().startup().unwrap()).unwrap(),
            r#"{"overlay":"calc"}"#
        );
    }

    #[test]
    fn calc_renders_result_line() {
        let response = respond(Calc::new().on_input(&Session::new(), "2 + 2").unwrap());
        let lines = response.lines.unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].text.contains("2 + 2 = 4"));
        assert_eq!(lines[0].identifier(), "4");
        assert!(!lines[0].filterable);
        assert!(lines[0].markup);
    }

    #[test]
    fn calc_clears_on_empty_input() {
        let response = respond(Calc::new().on_input(&Session::new(), "").unwrap());
        assert_eq!(response, Response::empty());
    }

    #[test]
    fn calc_reports_bad_expressions() {
        let err = Calc::new().on_input(&Session::new(), "2 +").unwrap_err();
        assert!(matches!(err, ProxyError::Eval(EvalError::Syntax(_))));
    }

    #[test]
    fn calc_copies_identifier() {
        let line = Line::new("markup").with_id("4");
        assert_eq!(
            Calc::new().on_select(&Session::new(), &line).unwrap(),
            Reaction::Finish {
                target: Target::Clipboard,
                text: "4".to_string()
            }
        );
    }

    #[test]
    fn simple_calc_uses_xor() {
        let response = respond(SimpleCalc::new().on_input(&Session::new(), "6 ^ 3").unwrap());
        assert_eq!(response.lines.unwrap(), vec![Line::new("5").filterable(false)]);
    }
}
