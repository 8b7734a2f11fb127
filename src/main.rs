//! Command line entry point.
//!
//! ```text
//! proxy-modes [--config <PATH>] [--trace-level <LEVEL>] <MODE>
//! ```
//!
//! The host runs this binary as a proxy mode script: the protocol uses stdin
//! and stdout, and log output goes to a file. The exit status is zero when the
//! host closes the stream or the session ends normally, and non-zero when a
//! protocol stream or an external command fails.

use clap::Parser;
use proxy_modes::builtin::ModeKind;
use proxy_modes::observability::init_tracing;
use proxy_modes::{serve, Config};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Plugin-side engine for rofi proxy modes.
#[derive(Parser, Debug)]
#[command(name = "proxy-modes", version)]
#[command(about = "Plugin-side engine for rofi proxy modes")]
struct Args {
    /// Configuration file (default: $XDG_CONFIG_HOME/rofi/proxy-modes.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level or filter directives, overriding the configuration
    #[arg(short, long, value_name = "LEVEL")]
    trace_level: Option<String>,

    /// Mode to run
    #[arg(value_enum)]
    mode: ModeKind,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("proxy-modes: {e}");
            return ExitCode::FAILURE;
        }
    };
    if args.trace_level.is_some() {
        config.trace_level = args.trace_level;
    }

    let log_file = init_tracing(&config);
    tracing::info!(mode = ?args.mode, log_file = ?log_file, "starting");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    match serve(args.mode, &config, stdin, stdout) {
        Ok(shutdown) => {
            tracing::info!(reason = ?shutdown, "exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("proxy-modes: {e}");
            ExitCode::FAILURE
        }
    }
}
