//! Wire protocol between the host and the plugin.
//!
//! Both directions use newline-delimited UTF-8 JSON objects:
//!
//! ```text
//! host  → plugin   {"name": "input", "value": "2 + 2"}
//! plugin → host    {"lines": [{"text": "...", "id": "4", "filtering": false, "markup": true}]}
//! ```
//!
//! - [`event`]: inbound events and their decoding
//! - [`response`]: outbound messages

pub mod event;
pub mod response;

pub use event::{DecodeError, Event, KeyCode, LineRef};
pub use response::Response;
