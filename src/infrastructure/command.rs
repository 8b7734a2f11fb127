//! External commands behind narrow capability traits.
//!
//! Modes never spawn processes. They ask for an [`ExternalAction`] (clipboard,
//! process signalling) or a [`LineSource`] (process listing), and the binary
//! wires those to real commands built from the configuration. Tests inject
//! recording fakes instead.
//!
//! Every command runs synchronously with a timeout. Its stdout never reaches
//! the protocol channel: actions discard it and sources capture it.

use crate::domain::{Line, ProxyError, Result};
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A side effect that consumes one piece of text.
pub trait ExternalAction {
    /// Runs the action with `text` as its payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the action cannot be started, fails, or times out.
    fn execute(&self, text: &str) -> Result<()>;
}

/// Something that produces catalog lines on demand.
pub trait LineSource {
    /// Produces the current lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines cannot be obtained.
    fn lines(&self) -> Result<Vec<Line>>;
}

/// How the payload reaches the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the command's stdin, which is then closed.
    Stdin,
    /// Appended as the last argument.
    Argument,
}

/// An [`ExternalAction`] backed by a command line.
#[derive(Debug, Clone)]
pub struct CommandAction {
    argv: Vec<String>,
    delivery: Delivery,
    timeout: Duration,
}

impl CommandAction {
    /// Creates an action running `argv`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if `argv` is empty.
    pub fn new(argv: Vec<String>, delivery: Delivery, timeout: Duration) -> Result<Self> {
        if argv.is_empty() {
            return Err(ProxyError::Config("command must not be empty".to_string()));
        }
        Ok(Self { argv, delivery, timeout })
    }
}

impl ExternalAction for CommandAction {
    fn execute(&self, text: &str) -> Result<()> {
        let mut command = build(&self.argv)?;
        match self.delivery {
            Delivery::Stdin => command.stdin(Stdio::piped()),
            Delivery::Argument => command.arg(text).stdin(Stdio::null()),
        };
        command.stdout(Stdio::null());

        let program = program_name(&self.argv);
        tracing::debug!(program = %program, delivery = ?self.delivery, "running command");
        let mut child = spawn(&mut command, &program)?;

        let writer = child.stdin.take().map(|mut stdin| {
            let payload = text.as_bytes().to_vec();
            thread::spawn(move || stdin.write_all(&payload))
        });

        let status = wait(&mut child, self.timeout, &program)?;
        check(status, program)?;

        if let Some(handle) = writer {
            match handle.join().map_err(|_| io::Error::other("stdin writer panicked"))? {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("command exited without reading its input");
                }
                result => result?,
            }
        }
        Ok(())
    }
}

/// A [`LineSource`] listing processes as `comm (pid)` lines identified by pid.
///
/// The command must print one `PID NAME` pair per line, like
/// `ps -e -o pid=,comm=`.
#[derive(Debug, Clone)]
pub struct ProcessList {
    argv: Vec<String>,
    timeout: Duration,
}

impl ProcessList {
    /// Creates a source running `argv`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if `argv` is empty.
    pub fn new(argv: Vec<String>, timeout: Duration) -> Result<Self> {
        if argv.is_empty() {
            return Err(ProxyError::Config("process listing command must not be empty".to_string()));
        }
        Ok(Self { argv, timeout })
    }
}

impl LineSource for ProcessList {
    fn lines(&self) -> Result<Vec<Line>> {
        let mut command = build(&self.argv)?;
        command.stdin(Stdio::null()).stdout(Stdio::piped());

        let program = program_name(&self.argv);
        let mut child = spawn(&mut command, &program)?;

        let reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || {
                let mut output = String::new();
                stdout.read_to_string(&mut output).map(|_| output)
            })
        });

        let status = wait(&mut child, self.timeout, &program)?;
        let output = match reader {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("process listing reader panicked"))??,
            None => String::new(),
        };
        check(status, program)?;

        let lines = parse_processes(&output);
        tracing::debug!(count = lines.len(), "processes listed");
        Ok(lines)
    }
}

/// Parses `PID NAME` pairs into lines. Malformed rows are skipped.
#[must_use]
pub fn parse_processes(output: &str) -> Vec<Line> {
    output
        .lines()
        .filter_map(|row| {
            let (pid, name) = row.trim().split_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || !pid.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(Line::new(format!("{name} ({pid})")).with_id(pid))
        })
        .collect()
}

fn build(argv: &[String]) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ProxyError::Config("command must not be empty".to_string()))?;
    let mut command = Command::new(program);
    command.args(args).stderr(Stdio::inherit());
    Ok(command)
}

fn program_name(argv: &[String]) -> String {
    argv.first().cloned().unwrap_or_default()
}

fn spawn(command: &mut Command, program: &str) -> Result<Child> {
    command.spawn().map_err(|source| ProxyError::Spawn {
        program: program.to_string(),
        source,
    })
}

fn wait(child: &mut Child, timeout: Duration, program: &str) -> Result<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            tracing::warn!(program = %program, ?timeout, "command timed out, killing it");
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "kill after timeout failed");
            }
            child.wait()?;
            return Err(ProxyError::CommandTimeout {
                program: program.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn check(status: ExitStatus, program: String) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        tracing::warn!(program = %program, code = ?status.code(), "command failed");
        Err(ProxyError::Command {
            program,
            code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_process_rows() {
        let lines = parse_processes("  42 firefox\n7 bash\n\nbad row\n 9 \n");
        assert_eq!(
            lines,
            vec![
                Line::new("firefox (42)").with_id("42"),
                Line::new("bash (7)").with_id("7"),
            ]
        );
    }

    #[test]
    fn rejects_empty_commands() {
        assert!(matches!(
            CommandAction::new(vec![], Delivery::Stdin, Duration::from_secs(1)),
            Err(ProxyError::Config(_))
        ));
        assert!(ProcessList::new(vec![], Duration::from_secs(1)).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn delivers_text_on_stdin() {
        let action = CommandAction::new(
            argv(&["sh", "-c", "test \"$(cat)\" = hello"]),
            Delivery::Stdin,
            Duration::from_secs(5),
        )
        .unwrap();
        action.execute("hello").unwrap();
        assert!(matches!(action.execute("other"), Err(ProxyError::Command { code: Some(1), .. })));
    }

    #[cfg(unix)]
    #[test]
    fn delivers_text_as_argument() {
        let action = CommandAction::new(
            argv(&["sh", "-c", "test \"$0\" = 42"]),
            Delivery::Argument,
            Duration::from_secs(5),
        )
        .unwrap();
        action.execute("42").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn reports_spawn_failures_and_timeouts() {
        let missing = CommandAction::new(
            argv(&["/nonexistent/proxy-modes-command"]),
            Delivery::Stdin,
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(matches!(missing.execute("x"), Err(ProxyError::Spawn { .. })));

        let slow = CommandAction::new(argv(&["sleep"]), Delivery::Argument, Duration::from_millis(100)).unwrap();
        let started = Instant::now();
        assert!(matches!(slow.execute("5"), Err(ProxyError::CommandTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn unread_stdin_does_not_outlive_the_timeout() {
        let deaf = CommandAction::new(argv(&["sleep", "5"]), Delivery::Stdin, Duration::from_millis(100)).unwrap();
        let payload = "x".repeat(1 << 20);
        let started = Instant::now();
        assert!(matches!(deaf.execute(&payload), Err(ProxyError::CommandTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));

        let quick = CommandAction::new(argv(&["true"]), Delivery::Stdin, Duration::from_secs(5)).unwrap();
        quick.execute(&payload).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn lists_processes_from_command_output() {
        let source = ProcessList::new(argv(&["printf", "1 init\\n 300 zsh\\n"]), Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.lines().unwrap(),
            vec![Line::new("init (1)").with_id("1"), Line::new("zsh (300)").with_id("300")]
        );
    }
}
