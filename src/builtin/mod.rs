//! Built-in modes selectable on the command line.
//!
//! | name          | behavior                                          |
//! |---------------|---------------------------------------------------|
//! | `calc`        | math expressions, Enter copies the result         |
//! | `simple-calc` | builtin-function expressions, `^` is xor          |
//! | `keys`        | reports custom key presses                        |
//! | `lines`       | one line per emphasis flag                        |
//! | `sub-modes`   | `kill` and `clipboard` nested modes               |
//! | `todo`        | free text appends, delete removes                 |
//! | `unicode`     | non-ASCII line, input echoed to stderr            |

mod calc;
mod demo;
mod sub_modes;

pub use calc::{Calc, SimpleCalc};
pub use demo::{Keys, Lines, Todo, Unicode};
pub use sub_modes::SubModes;

use crate::app::Mode;
use crate::domain::Result;
use crate::infrastructure::ProcessList;
use crate::Config;
use clap::ValueEnum;

/// Names of the built-in modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeKind {
    /// Math calculator with clipboard copy
    Calc,
    /// Calculator with builtin functions
    SimpleCalc,
    /// Custom key bindings demo
    Keys,
    /// Line flags demo
    Lines,
    /// Nested kill and clipboard sub-modes
    SubModes,
    /// Todo list
    Todo,
    /// Unicode echo demo
    Unicode,
}

/// Builds the mode named by `kind` from the configuration.
///
/// # Errors
///
/// Returns [`ProxyError::Config`](crate::ProxyError::Config) if a command the
/// mode needs is misconfigured.
pub fn create(kind: ModeKind, config: &Config) -> Result<Box<dyn Mode>> {
    tracing::debug!(mode = ?kind, "creating mode");
    Ok(match kind {
        ModeKind::Calc => Box::new(Calc::new()),
        ModeKind::SimpleCalc => Box::new(SimpleCalc::new()),
        ModeKind::Keys => Box::new(Keys),
        ModeKind::Lines => Box::new(Lines),
        ModeKind::SubModes => {
            let processes = ProcessList::new(config.processes.command.clone(), config.command_timeout())?;
            Box::new(SubModes::new(Box::new(processes), config.sub_modes.snippets.clone()))
        }
        ModeKind::Todo => Box::new(Todo::default()),
        ModeKind::Unicode => Box::new(Unicode::new(std::io::stderr())),
    })
}
