//! Outbound messages sent to the host.
//!
//! A [`Response`] only carries the fields that change; absent fields leave the
//! host's current value alone. A response with `lines` replaces the whole list.

use crate::domain::Line;
use serde::{Deserialize, Serialize};

/// One outbound message.
///
/// # Examples
///
/// ```
/// use proxy_modes::protocol::Response;
///
/// assert_eq!(serde_json::to_string(&Response::empty()).unwrap(), r#"{"lines":[]}"#);
/// assert_eq!(
///     serde_json::to_string(&Response::new().with_overlay("calc")).unwrap(),
///     r#"{"overlay":"calc"}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Full replacement for the host list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<Line>>,

    /// Text forced into the host input field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Label next to the input field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Hint text; may contain host markup and `\r` line breaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Whether the host hides the outer combi list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_combi_lines: Option<bool>,

    /// Whether cancel closes the host instead of reaching the plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_by_cancel: Option<bool>,

    /// Host overlay to activate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
}

impl Response {
    /// A response that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A response that clears the list.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_lines(Vec::new())
    }

    /// A response that replaces the list.
    #[must_use]
    pub fn with_lines(lines: Vec<Line>) -> Self {
        Self {
            lines: Some(lines),
            ..Self::default()
        }
    }

    /// Sets the list.
    #[must_use]
    pub fn lines(mut self, lines: Vec<Line>) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Sets the input field text.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the overlay.
    #[must_use]
    pub fn with_overlay(mut self, overlay: impl Into<String>) -> Self {
        self.overlay = Some(overlay.into());
        self
    }

    /// Sets `hide_combi_lines`.
    #[must_use]
    pub const fn hide_combi_lines(mut self, hide: bool) -> Self {
        self.hide_combi_lines = Some(hide);
        self
    }

    /// Sets `exit_by_cancel`.
    #[must_use]
    pub const fn exit_by_cancel(mut self, exit: bool) -> Self {
        self.exit_by_cancel = Some(exit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_set_fields_are_serialized() {
        let response = Response::new().with_help("Press Enter to add text");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"help": "Press Enter to add text"}));
    }

    #[test]
    fn sub_mode_message_shape() {
        let response = Response::with_lines(vec![Line::new("process1")])
            .with_input("")
            .with_prompt("kill")
            .hide_combi_lines(true)
            .exit_by_cancel(false);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "lines": [{"text": "process1"}],
                "input": "",
                "prompt": "kill",
                "hide_combi_lines": true,
                "exit_by_cancel": false
            })
        );
    }
}
