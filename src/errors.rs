// src/errors.rs

//! Crate-wide error type and `Result` alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchrunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unusable watch path {path:?}: {source}")]
    InvalidWatchPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not initialise file watcher: {0}")]
    WatchInit(#[from] notify::Error),

    #[error("filesystem event stream closed")]
    EventStreamClosed,

    #[error("a managed process is already running (pid {pid:?})")]
    AlreadyRunning { pid: Option<u32> },

    #[error("build command exited with status {code:?}")]
    BuildFailed { code: Option<i32> },

    #[error("could not start build command: {0}")]
    BuildSpawn(#[source] std::io::Error),

    #[error("could not start '{program}': {source}")]
    RunSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("run command is empty")]
    EmptyCommand,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WatchrunError>;
