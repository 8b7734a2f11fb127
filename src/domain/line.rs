//! Line domain model.
//!
//! A [`Line`] is one selectable entry of the host's list. Lines are built by
//! modes, stored in the [`LineCatalog`](super::LineCatalog) and serialized as
//! part of every outbound message that carries a `lines` array.

use serde::{Deserialize, Serialize};

/// One selectable or display-only entry of the host list.
///
/// Default-valued attributes are left out of the serialized object, so a plain
/// line goes over the wire as `{"text":"..."}`.
///
/// # Examples
///
/// ```
/// use proxy_modes::Line;
///
/// let line = Line::new("4").with_id("4").filterable(false);
/// assert_eq!(line.identifier(), "4");
/// assert_eq!(
///     serde_json::to_string(&line).unwrap(),
///     r#"{"text":"4","id":"4","filtering":false}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Display string, in the host's markup dialect when `markup` is set.
    pub text: String,

    /// Opaque identifier used for selection and deletion; falls back to `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whether the host filters this line against the typed input.
    #[serde(rename = "filtering", default = "default_true", skip_serializing_if = "is_true")]
    pub filterable: bool,

    /// Whether `text` contains host markup.
    #[serde(default, skip_serializing_if = "is_false")]
    pub markup: bool,

    /// Urgent emphasis flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub urgent: bool,

    /// Active emphasis flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub active: bool,

    /// Icon name resolved by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Grouping label, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

const fn default_true() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_true(value: &bool) -> bool {
    *value
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl Line {
    /// Creates a filterable plain-text line with no identifier.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: None,
            filterable: true,
            markup: false,
            urgent: false,
            active: false,
            icon: None,
            group: None,
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets whether the host filters this line.
    #[must_use]
    pub const fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Marks the text as containing host markup.
    #[must_use]
    pub const fn markup(mut self, markup: bool) -> Self {
        self.markup = markup;
        self
    }

    /// Sets the urgent flag.
    #[must_use]
    pub const fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the identifier used for matching, defaulting to the text.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_defaults_to_text() {
        let line = Line::new("bla");
        assert_eq!(line.identifier(), "bla");
        assert_eq!(line.with_id("x").identifier(), "x");
    }

    #[test]
    fn defaults_are_omitted_from_wire() {
        let json = serde_json::to_string(&Line::new("normal")).unwrap();
        assert_eq!(json, r#"{"text":"normal"}"#);
    }

    #[test]
    fn emphasis_and_icon_serialize() {
        let line = Line::new("with icon")
            .filterable(false)
            .urgent(true)
            .with_icon("applications-internet");
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["filtering"], false);
        assert_eq!(value["urgent"], true);
        assert_eq!(value["icon"], "applications-internet");
        assert!(value.get("active").is_none());
    }

    #[test]
    fn missing_attributes_deserialize_to_defaults() {
        let line: Line = serde_json::from_str(r#"{"text":"a"}"#).unwrap();
        assert!(line.filterable);
        assert!(!line.markup);
        assert_eq!(line, Line::new("a"));
    }
}
