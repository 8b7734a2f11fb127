//! Proxy modes: the plugin side of a rofi proxy mode.
//!
//! The host spawns this process and talks to it over stdio with
//! newline-delimited JSON:
//! - Inbound events: typed input, key presses, line selection and deletion
//! - Outbound responses: the line list plus input, prompt, help and flags
//! - A session with a stack of nested sub-modes, unwound with cancel
//! - Built-in modes: calculators, a todo list, combi-style sub-modes and demos

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Binary (main.rs)                                   │  ← CLI, exit code
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Event loop
//! │  - Event handling, cancel and sub-mode stack        │  ← Session state
//! │  - Action dispatching                               │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Modes         │   │ Transport     │   │ Evaluator     │
//! │ (builtin/)    │   │ (transport/,  │   │ (eval/)       │
//! │ - calc, todo  │   │  protocol/)   │   │ - Lexer       │
//! │ - sub-modes   │   │ - JSON lines  │   │ - Parser      │
//! │ - demos       │   │ - Events      │   │ - Scopes      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - XDG paths, external commands (infrastructure/)   │
//! │  - Error types (domain/error)                       │
//! │  - Line model and catalog (domain/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing fmt layer                                │
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`builtin`]: The modes selectable on the command line
//! - [`domain`]: Core domain types (lines, catalog, errors)
//! - [`eval`]: Sandboxed arithmetic evaluator
//! - [`infrastructure`]: Paths and external commands
//! - [`observability`]: Logging to a rotating file
//! - [`protocol`]: Inbound events and outbound responses
//! - [`transport`]: Line-oriented JSON reader/writer
//!
//! # Configuration
//!
//! An optional TOML file at `$XDG_CONFIG_HOME/rofi/proxy-modes.toml`:
//!
//! ```toml
//! trace_level = "debug"
//! log_file = "~/.cache/proxy-modes.log"
//! command_timeout_ms = 5000
//!
//! [clipboard]
//! command = ["xclip", "-selection", "c"]
//!
//! [kill]
//! command = ["kill"]
//!
//! [processes]
//! command = ["ps", "-e", "-o", "pid=,comm="]
//!
//! [sub_modes]
//! snippets = ["bla", "bla bla bla"]
//! ```
//!
//! # Session Flow
//!
//! 1. **Start** (`main.rs`):
//!    - Load configuration, initialize tracing
//!    - Build the selected mode and its command capabilities
//!
//! 2. **Startup message**: the mode's initial response is written before
//!    anything is read.
//!
//! 3. **Event loop**: one line in, at most one line out. Malformed lines and
//!    failed evaluations clear the list; unknown event names are ignored.
//!
//! 4. **End**: the host closes stdin, cancel ends the session, or a mode
//!    finishes after running a command.
//!
//! # Examples
//!
//! ```rust
//! use proxy_modes::builtin::ModeKind;
//! use proxy_modes::{serve, Config, Shutdown};
//! use std::io::Cursor;
//!
//! let input = Cursor::new("{\"name\":\"input\",\"value\":\"2 + 2\"}\n");
//! let mut output = Vec::new();
//!
//! let shutdown = serve(ModeKind::SimpleCalc, &Config::default(), input, &mut output)?;
//! assert_eq!(shutdown, Shutdown::StreamClosed);
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "{\"lines\":[]}\n{\"lines\":[{\"text\":\"4\",\"filtering\":false}]}\n"
//! );
//! # Ok::<(), proxy_modes::ProxyError>(())
//! ```

pub mod app;
pub mod builtin;
pub mod domain;
pub mod eval;
pub mod infrastructure;
pub mod observability;
pub mod protocol;
pub mod transport;

pub use app::{handle_event, Action, Effects, Mode, Session, Shutdown};
pub use domain::{Line, LineCatalog, ProxyError, Result};
pub use protocol::{Event, Response};

use builtin::ModeKind;
use infrastructure::{paths, CommandAction, Delivery};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;
use transport::Transport;

/// Configuration loaded from the optional TOML file.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Example
///
/// ```rust
/// use proxy_modes::Config;
///
/// let config = Config::parse("command_timeout_ms = 250\n[kill]\ncommand = [\"kill\", \"-9\"]")?;
/// assert_eq!(config.command_timeout().as_millis(), 250);
/// assert_eq!(config.kill.command, vec!["kill", "-9"]);
/// assert_eq!(config.clipboard.command, vec!["xclip", "-selection", "c"]);
/// # Ok::<(), proxy_modes::ProxyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tracing level or `EnvFilter` directives.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file path; `~` is expanded. Default: `$XDG_DATA_HOME/rofi/proxy-modes.log`
    pub log_file: Option<String>,

    /// Timeout for every external command, in milliseconds. Default: `5000`
    pub command_timeout_ms: u64,

    /// Clipboard command; the text is written to its stdin.
    pub clipboard: CommandConfig,

    /// Process signalling command; the pid is appended as an argument.
    pub kill: CommandConfig,

    /// Process listing command printing `PID NAME` rows.
    pub processes: CommandConfig,

    /// Settings of the `sub-modes` mode.
    pub sub_modes: SubModesConfig,
}

/// A command line given as program and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    pub command: Vec<String>,
}

impl CommandConfig {
    fn of(argv: &[&str]) -> Self {
        Self {
            command: argv.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubModesConfig {
    /// Lines offered by the `clipboard` sub-mode.
    pub snippets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: None,
            log_file: None,
            command_timeout_ms: 5000,
            clipboard: CommandConfig::of(&["xclip", "-selection", "c"]),
            kill: CommandConfig::of(&["kill"]),
            processes: CommandConfig::of(&["ps", "-e", "-o", "pid=,comm="]),
            sub_modes: SubModesConfig::default(),
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::ConfigParse`] for invalid TOML or unknown keys.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if an explicit file cannot be read, and
    /// [`ProxyError::ConfigParse`] if a file is not valid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match paths::default_config_file() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProxyError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// Timeout applied to external commands.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Builds the clipboard and kill capabilities from the configured commands.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if a command is empty.
    pub fn effects(&self) -> Result<Effects> {
        let timeout = self.command_timeout();
        let clipboard = CommandAction::new(self.clipboard.command.clone(), Delivery::Stdin, timeout)?;
        let kill = CommandAction::new(self.kill.command.clone(), Delivery::Argument, timeout)?;
        Ok(Effects::new(Box::new(clipboard), Box::new(kill)))
    }
}

/// Runs the built-in mode `kind` over the given streams.
///
/// # Errors
///
/// Returns an error if the configuration is unusable, a protocol stream
/// fails, or an external command fails.
pub fn serve<R: BufRead, W: Write>(kind: ModeKind, config: &Config, reader: R, writer: W) -> Result<Shutdown> {
    let mut mode = builtin::create(kind, config)?;
    let effects = config.effects()?;
    let mut transport = Transport::new(reader, writer);
    app::run(mode.as_mut(), &mut transport, &effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parses_every_section() {
        let config = Config::parse(
            r#"
            trace_level = "debug"
            log_file = "~/x.log"
            command_timeout_ms = 100

            [clipboard]
            command = ["wl-copy"]

            [processes]
            command = ["ps", "-u", "me", "-o", "pid=,comm="]

            [sub_modes]
            snippets = ["one", "two"]
            "#,
        )
        .unwrap();

        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.command_timeout(), Duration::from_millis(100));
        assert_eq!(config.clipboard.command, vec!["wl-copy"]);
        assert_eq!(config.kill, Config::default().kill);
        assert_eq!(config.sub_modes.snippets, vec!["one", "two"]);
    }

    #[test]
    fn rejects_unknown_keys_and_missing_commands() {
        assert!(matches!(Config::parse("colour = 1"), Err(ProxyError::ConfigParse(_))));
        assert!(matches!(Config::parse("[kill]"), Err(ProxyError::ConfigParse(_))));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(ProxyError::Config(_))));

        let path = dir.path().join("proxy-modes.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "command_timeout_ms = 42").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().command_timeout_ms, 42);
    }

    #[test]
    fn empty_command_is_rejected() {
        let config = Config {
            clipboard: CommandConfig { command: vec![] },
            ..Config::default()
        };
        assert!(matches!(config.effects(), Err(ProxyError::Config(_))));
    }
}
