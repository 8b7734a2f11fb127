//! Session state and the sub-mode stack.
//!
//! This module defines [`Session`], the single state container owned by the
//! event loop. It mirrors what the host currently shows: every response that
//! leaves the process is folded into the session with [`Session::record`], so
//! the catalog used to resolve `select_line` and `delete_line` is always the
//! one the user is looking at.
//!
//! # Sub-mode Stack
//!
//! Entering a sub-mode snapshots the current catalog and view into a
//! [`Frame`] before the sub-mode's lines replace them. Leaving it pops the
//! frame and re-emits the parent's full view.
//!
//! ```text
//!  top level            push("kill")             pop
//! ┌──────────┐        ┌──────────────┐       ┌──────────┐
//! │ kill     │ ─────▶ │ firefox (42) │ ────▶ │ kill     │
//! │ clipboard│        │ bash (7)     │       │ clipboard│
//! │ prompt:  │        │ prompt: kill │       │ prompt:  │
//! │  combi   │        │ stack: [kill]│       │  combi   │
//! └──────────┘        └──────────────┘       └──────────┘
//! ```

use super::modes::SubMode;
use crate::domain::LineCatalog;
use crate::protocol::Response;

/// Host-side presentation fields last sent by the plugin.
///
/// `None` means the plugin never set the field and the host default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub input: Option<String>,
    pub prompt: Option<String>,
    pub help: Option<String>,
    pub hide_combi_lines: Option<bool>,
    pub exit_by_cancel: Option<bool>,
    pub overlay: Option<String>,
}

impl View {
    fn apply(&mut self, response: &Response) {
        if let Some(input) = &response.input {
            self.input = Some(input.clone());
        }
        if let Some(prompt) = &response.prompt {
            self.prompt = Some(prompt.clone());
        }
        if let Some(help) = &response.help {
            self.help = Some(help.clone());
        }
        if let Some(hide) = response.hide_combi_lines {
            self.hide_combi_lines = Some(hide);
        }
        if let Some(exit) = response.exit_by_cancel {
            self.exit_by_cancel = Some(exit);
        }
        if let Some(overlay) = &response.overlay {
            self.overlay = Some(overlay.clone());
        }
    }
}

/// Saved parent state of an active sub-mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Name of the sub-mode this frame belongs to.
    pub name: String,
    catalog: LineCatalog,
    view: View,
}

/// Mutable state of one plugin process.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Lines currently shown by the host.
    pub catalog: LineCatalog,
    /// Presentation fields currently in effect.
    pub view: View,
    mode_stack: Vec<Frame>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds an outbound response into the session.
    ///
    /// A response carrying `lines` replaces the catalog as a whole.
    pub fn record(&mut self, response: &Response) {
        if let Some(lines) = &response.lines {
            self.catalog.replace(lines.clone());
        }
        self.view.apply(response);
    }

    /// Name of the innermost active sub-mode, if any.
    #[must_use]
    pub fn active_sub_mode(&self) -> Option<&str> {
        self.mode_stack.last().map(|frame| frame.name.as_str())
    }

    /// Number of nested sub-modes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.mode_stack.len()
    }

    /// Whether cancel terminates the session. The host default is `true`.
    #[must_use]
    pub fn exits_on_cancel(&self) -> bool {
        self.view.exit_by_cancel.unwrap_or(true)
    }

    /// Enters a sub-mode and returns the response that shows it.
    ///
    /// The current catalog and view are saved so [`Session::pop_sub_mode`]
    /// can restore them.
    pub fn push_sub_mode(&mut self, sub_mode: SubMode) -> Response {
        tracing::debug!(
            sub_mode = %sub_mode.name,
            lines = sub_mode.lines.len(),
            depth = self.mode_stack.len() + 1,
            "entering sub-mode"
        );

        self.mode_stack.push(Frame {
            name: sub_mode.name,
            catalog: self.catalog.clone(),
            view: self.view.clone(),
        });

        let mut response = Response::with_lines(sub_mode.lines)
            .with_input("")
            .with_prompt(sub_mode.prompt)
            .hide_combi_lines(sub_mode.hide_combi_lines)
            .exit_by_cancel(sub_mode.exit_by_cancel);
        if let Some(help) = sub_mode.help {
            response = response.with_help(help);
        }

        self.record(&response);
        response
    }

    /// Leaves the innermost sub-mode and returns the parent's full view.
    ///
    /// Fields the parent never set are sent with their host defaults so
    /// nothing from the sub-mode leaks through. Returns `None` at top level.
    pub fn pop_sub_mode(&mut self) -> Option<Response> {
        let frame = self.mode_stack.pop()?;
        tracing::debug!(sub_mode = %frame.name, depth = self.mode_stack.len(), "leaving sub-mode");

        let response = Response::with_lines(frame.catalog.to_vec())
            .with_input("")
            .with_prompt(frame.view.prompt.clone().unwrap_or_default())
            .with_help(frame.view.help.clone().unwrap_or_default())
            .hide_combi_lines(frame.view.hide_combi_lines.unwrap_or(false))
            .exit_by_cancel(frame.view.exit_by_cancel.unwrap_or(true));

        self.catalog = frame.catalog;
        self.view = frame.view;
        self.view.input = Some(String::new());
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Line;
    use pretty_assertions::assert_eq;

    fn top_level() -> Session {
        let mut session = Session::new();
        session.record(
            &Response::with_lines(vec![Line::new("kill"), Line::new("clipboard")]).with_prompt("combi"),
        );
        session
    }

    #[test]
    fn record_replaces_catalog_and_merges_view() {
        let mut session = top_level();
        session.record(&Response::new().with_help("help"));
        assert_eq!(session.catalog.len(), 2);
        assert_eq!(session.view.prompt.as_deref(), Some("combi"));
        assert_eq!(session.view.help.as_deref(), Some("help"));

        session.record(&Response::empty());
        assert!(session.catalog.is_empty());
        assert_eq!(session.view.prompt.as_deref(), Some("combi"));
    }

    #[test]
    fn push_emits_sub_mode_view() {
        let mut session = top_level();
        let response = session.push_sub_mode(
            SubMode::new("clipboard", vec![Line::new("bla"), Line::new("bla bla bla")]).with_help("esc"),
        );

        assert_eq!(
            response,
            Response::with_lines(vec![Line::new("bla"), Line::new("bla bla bla")])
                .with_input("")
                .with_prompt("clipboard")
                .with_help("esc")
                .hide_combi_lines(true)
                .exit_by_cancel(false)
        );
        assert_eq!(session.active_sub_mode(), Some("clipboard"));
        assert_eq!(session.depth(), 1);
        assert!(!session.exits_on_cancel());
    }

    #[test]
    fn pop_restores_parent_exactly() {
        let mut session = top_level();
        let catalog_before = session.catalog.clone();
        session.push_sub_mode(SubMode::new("kill", vec![Line::new("bash (7)")]).with_help("esc"));

        let response = session.pop_sub_mode().unwrap();
        assert_eq!(
            response,
            Response::with_lines(catalog_before.to_vec())
                .with_input("")
                .with_prompt("combi")
                .with_help("")
                .hide_combi_lines(false)
                .exit_by_cancel(true)
        );
        assert_eq!(session.catalog, catalog_before);
        assert_eq!(session.view.prompt.as_deref(), Some("combi"));
        assert_eq!(session.view.help, None);
        assert_eq!(session.depth(), 0);
        assert!(session.exits_on_cancel());
    }

    #[test]
    fn pop_restores_parent_help_and_flags() {
        let mut session = top_level();
        session.record(
            &Response::new()
                .with_help("Press Enter to add text")
                .hide_combi_lines(true),
        );
        session.push_sub_mode(SubMode::new("kill", vec![Line::new("bash (7)")]).with_help("esc"));
        assert_eq!(session.view.help.as_deref(), Some("esc"));

        let response = session.pop_sub_mode().unwrap();
        assert_eq!(response.help.as_deref(), Some("Press Enter to add text"));
        assert_eq!(response.prompt.as_deref(), Some("combi"));
        assert_eq!(response.hide_combi_lines, Some(true));
        assert_eq!(session.view.help.as_deref(), Some("Press Enter to add text"));
    }

    #[test]
    fn nested_sub_modes_unwind_one_level_at_a_time() {
        let mut session = top_level();
        session.push_sub_mode(SubMode::new("outer", vec![Line::new("a")]));
        session.push_sub_mode(SubMode::new("inner", vec![Line::new("b")]));

        let response = session.pop_sub_mode().unwrap();
        assert_eq!(response.prompt.as_deref(), Some("outer"));
        assert_eq!(response.exit_by_cancel, Some(false));
        assert_eq!(session.active_sub_mode(), Some("outer"));

        session.pop_sub_mode();
        assert!(session.pop_sub_mode().is_none());
    }
}
