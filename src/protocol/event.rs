//! Inbound events sent by the host.
//!
//! Every inbound line is a JSON object `{"name": <kind>, "value": <payload>}`.
//! [`Event::decode`] validates the payload shape for each kind at the boundary,
//! so the rest of the crate only ever sees typed variants.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Why an inbound line could not be turned into an [`Event`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The line is not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The line is not a JSON object.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The object has no string `name` field.
    #[error("missing event name")]
    MissingName,

    /// The `name` is well-formed but not a known event kind.
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    /// The `value` does not have the shape the event kind requires.
    #[error("invalid payload for `{name}`: {reason}")]
    Payload {
        /// Event kind whose payload was rejected.
        name: String,
        /// Description of the mismatch.
        reason: String,
    },
}

impl DecodeError {
    /// Whether the loop should answer this failure with an empty catalog.
    ///
    /// Unknown event kinds are ignored instead.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        !matches!(self, Self::UnknownEvent(_))
    }
}

/// Symbolic key code carried by a `key_press` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCode {
    /// Escape / cancel.
    Cancel,
    /// User-defined key `custom_N`.
    Custom(u8),
    /// Any other code, kept verbatim.
    Other(String),
}

impl KeyCode {
    /// Parses a host key code string.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        if code == "cancel" {
            return Self::Cancel;
        }
        code.strip_prefix("custom_")
            .and_then(|n| n.parse::<u8>().ok())
            .map_or_else(|| Self::Other(code.to_string()), Self::Custom)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancel => f.write_str("cancel"),
            Self::Custom(n) => write!(f, "custom_{n}"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Reference to a host line in `select_line` and `delete_line` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineRef {
    /// Identifier, when the line carried one.
    #[serde(default)]
    pub id: Option<String>,
    /// Display text.
    #[serde(default)]
    pub text: Option<String>,
}

impl LineRef {
    /// Identifier to match against the catalog: `id`, else `text`.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.text.as_deref())
    }
}

/// A decoded inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Current contents of the host input field.
    Input(String),
    /// A key bound to the mode was pressed.
    KeyPress(KeyCode),
    /// The user committed a line from the list.
    SelectLine(LineRef),
    /// The user committed free text that matched no line.
    SelectCustomInput(String),
    /// The user asked to delete a line.
    DeleteLine(LineRef),
}

#[derive(Deserialize)]
struct Envelope {
    name: Option<String>,
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct KeyPayload {
    key: String,
}

impl Event {
    /// Decodes one inbound JSON line.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the line is not JSON, has no `name`, has
    /// an unknown `name`, or carries a payload of the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use proxy_modes::protocol::{Event, KeyCode};
    ///
    /// let event = Event::decode(r#"{"name":"key_press","value":{"key":"cancel"}}"#).unwrap();
    /// assert_eq!(event, Event::KeyPress(KeyCode::Cancel));
    /// ```
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(line)?;
        let name = envelope.name.ok_or(DecodeError::MissingName)?;
        let value = envelope.value;

        match name.as_str() {
            "input" => Ok(Self::Input(payload(&name, value)?)),
            "select_custom_input" => Ok(Self::SelectCustomInput(payload(&name, value)?)),
            "key_press" => {
                let key: KeyPayload = payload(&name, value)?;
                Ok(Self::KeyPress(KeyCode::parse(&key.key)))
            }
            "select_line" | "delete_line" => {
                let line: LineRef = payload(&name, value)?;
                if line.identifier().is_none() {
                    return Err(DecodeError::Payload {
                        name,
                        reason: "line has neither `id` nor `text`".to_string(),
                    });
                }
                if name == "select_line" {
                    Ok(Self::SelectLine(line))
                } else {
                    Ok(Self::DeleteLine(line))
                }
            }
            _ => Err(DecodeError::UnknownEvent(name)),
        }
    }

    /// Event kind as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::KeyPress(_) => "key_press",
            Self::SelectLine(_) => "select_line",
            Self::SelectCustomInput(_) => "select_custom_input",
            Self::DeleteLine(_) => "delete_line",
        }
    }
}

fn payload<T: serde::de::DeserializeOwned>(name: &str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::Payload {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
