//! Application layer coordinating the session, events, and actions.
//!
//! This module sits between the transport (which speaks JSON lines) and the
//! built-in modes (which decide what each event means). It implements a
//! unidirectional flow:
//!
//! ```text
//! Event → handle_event → Mode callback → Reaction → Session update → Actions
//!                                                                      ↓
//!                                            runner: write / run command / exit
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing shared by all modes
//! - [`modes`]: The [`Mode`] trait and sub-mode description
//! - [`runner`]: The blocking event loop
//! - [`state`]: The session and its sub-mode stack

pub mod actions;
pub mod handler;
pub mod modes;
pub mod runner;
pub mod state;

pub use actions::{Action, Target};
pub use handler::handle_event;
pub use modes::{Mode, Reaction, SubMode};
pub use runner::{run, Effects, Shutdown};
pub use state::{Session, View};
