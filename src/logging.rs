// src/logging.rs

//! Diagnostics for the supervisor itself.
//!
//! Build and run commands inherit our stdout and stderr, so our own lines
//! are interleaved with theirs. They go to stderr without targets or thread
//! info to stay short next to the child's output.
//!
//! The level comes from `--log-level`, else `WATCHRUN_LOG`, else `info`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

const LOG_ENV: &str = "WATCHRUN_LOG";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = cli_level
        .map(Level::from)
        .or_else(|| std::env::var(LOG_ENV).ok().and_then(|s| env_level(&s)))
        .unwrap_or(Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// An unrecognised value falls back to the default rather than failing startup.
fn env_level(s: &str) -> Option<Level> {
    s.trim().parse().ok()
}
