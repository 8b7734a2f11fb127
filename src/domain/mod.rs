//! Domain layer for the proxy mode engine.
//!
//! Core types independent of the wire protocol and of any particular mode.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`line`]: The selectable line model
//! - [`catalog`]: Ordered line storage mirrored to the host
//!
//! # Examples
//!
//! ```
//! use proxy_modes::domain::{Line, LineCatalog};
//!
//! let mut catalog = LineCatalog::new();
//! catalog.push(Line::new("bla"));
//! catalog.push(Line::new("bla bla bla"));
//! catalog.remove("bla");
//! assert_eq!(catalog.len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod line;

pub use catalog::LineCatalog;
pub use error::{ProxyError, Result};
pub use line::Line;
