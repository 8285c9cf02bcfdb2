// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};

const USAGE_EXAMPLES: &str = "\
Examples:
    watchrun --build 'cargo build' -- ./target/debug/app
    watchrun --exclude target --exclude .git -- ./server
    watchrun --watch assets/ -- npm run serve";

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchrun",
    version = concat!("v", env!("CARGO_PKG_VERSION")),
    disable_version_flag = true,
    about = "Watch a directory, rebuild on change and restart a long-lived command.",
    after_help = USAGE_EXAMPLES,
    long_about = None
)]
pub struct CliArgs {
    /// Build command, interpreted by the shell. Runs before every (re)start.
    #[arg(short, long, value_name = "CMD")]
    pub build: Option<String>,

    /// Directory to watch for changes.
    ///
    /// Default: the current working directory.
    #[arg(short, long, value_name = "DIR")]
    pub watch: Option<PathBuf>,

    /// Directory to exclude, relative to the watch root. Repeatable; also
    /// accepts comma-separated lists.
    #[arg(short, long, value_name = "DIR", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Optional TOML project file. CLI flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debounce window in milliseconds.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Hard-kill the run command if it has not exited this many milliseconds
    /// after the termination signal. Without it, shutdown waits indefinitely.
    #[arg(long, value_name = "MS")]
    pub kill_timeout_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Command to run (and restart) after each successful build.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse `std::env::args`, exiting with status 1 on usage errors.
///
/// `--help` and `--version` still exit with status 0.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    }
}

/// Usage error for a run without a trailing `-- COMMAND`.
pub fn missing_command_error() -> clap::Error {
    CliArgs::command().error(
        ErrorKind::MissingRequiredArgument,
        "missing command to execute after `--`",
    )
}

/// Print [`missing_command_error`] with the usage line and exit with status 1.
pub fn exit_missing_command() -> ! {
    let _ = missing_command_error().print();
    std::process::exit(1);
}
