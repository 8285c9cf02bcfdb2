// src/config/mod.rs

//! Configuration for watchrun.
//!
//! Responsibilities:
//! - Define the optional TOML project file (`model.rs`) and load it (`loader.rs`).
//! - Merge CLI flags over file values into one immutable [`Config`].
//! - Validate the merged result (`validate.rs`).
//!
//! The resulting [`Config`] is built once in `lib.rs` and handed by reference
//! to every component constructor; nothing reads global state afterwards.

pub mod loader;
pub mod model;
pub mod validate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CliArgs;
use crate::errors::{Result, WatchrunError};

pub use loader::load_project_file;
pub use model::{ProjectFile, ShutdownSection, WatchSection};
pub use validate::validate_config;

/// Debounce window used when neither the CLI nor the project file sets one.
///
/// Long enough to absorb editors that write a file several times per save
/// (atomic rename, format-on-save).
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Absolute watch root plus the subtrees pruned from registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub root: PathBuf,
    /// Prefixes relative to `root`.
    pub excludes: Vec<String>,
}

impl WatchRoot {
    pub fn new(root: impl Into<PathBuf>, excludes: Vec<String>) -> Self {
        Self {
            root: root.into(),
            excludes,
        }
    }

    /// `true` when `path` starts with `root/<exclude>` for any exclude.
    ///
    /// This is a plain string-prefix test: with exclude `b`, the sibling
    /// `bb` is pruned as well.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let candidate = path.to_string_lossy();
        self.excluded_prefixes()
            .any(|prefix| candidate.starts_with(prefix.as_str()))
    }

    fn excluded_prefixes(&self) -> impl Iterator<Item = String> + '_ {
        self.excludes.iter().map(|exclude| {
            let trimmed = exclude.trim_end_matches('/');
            self.root.join(trimmed).to_string_lossy().into_owned()
        })
    }
}

/// Immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub watch: WatchRoot,
    /// Shell-interpreted build command; `None` skips the build step.
    pub build: Option<String>,
    /// Run command vector; the first element is the program.
    pub command: Vec<String>,
    pub debounce: Duration,
    /// `None` waits indefinitely for the run process to exit on stop.
    pub kill_timeout: Option<Duration>,
}

impl Config {
    /// Merge CLI flags over an optional project file and validate the result.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => Some((load_project_file(path)?, config_dir(path))),
            None => None,
        };
        let (file, file_dir) = match file {
            Some((file, dir)) => (file, Some(dir)),
            None => (ProjectFile::default(), None),
        };

        let build = args
            .build
            .clone()
            .or(file.build)
            .filter(|cmd| !cmd.trim().is_empty());

        let command = if args.command.is_empty() {
            file.command
        } else {
            args.command.clone()
        };

        let root = match (&args.watch, file.watch.root, file_dir) {
            (Some(cli_root), _, _) => cli_root.clone(),
            (None, Some(file_root), Some(dir)) => dir.join(file_root),
            (None, Some(file_root), None) => file_root,
            (None, None, _) => PathBuf::from("."),
        };
        let root = std::path::absolute(&root)
            .map_err(|source| WatchrunError::InvalidWatchPath { path: root, source })?;

        let mut excludes = file.watch.exclude;
        excludes.extend(args.exclude.iter().cloned());

        let debounce = args
            .debounce_ms
            .or(file.watch.debounce_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE);

        let kill_timeout = args
            .kill_timeout_ms
            .or(file.shutdown.kill_timeout_ms)
            .map(Duration::from_millis);

        let config = Config {
            watch: WatchRoot::new(root, excludes),
            build,
            command,
            debounce,
            kill_timeout,
        };
        validate_config(&config)?;
        Ok(config)
    }
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
