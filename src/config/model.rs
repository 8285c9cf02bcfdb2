// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Optional project file, read with `--config`.
///
/// ```toml
/// build = "cargo build"
/// command = ["./target/debug/app", "--port", "8080"]
///
/// [watch]
/// root = "."
/// exclude = ["target", ".git"]
/// debounce_ms = 600
///
/// [shutdown]
/// kill_timeout_ms = 5000
/// ```
///
/// Every key is optional; CLI flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    #[serde(default)]
    pub build: Option<String>,

    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub shutdown: ShutdownSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Relative roots resolve against the project file's directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub debounce_ms: Option<u64>,
}

/// `[shutdown]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShutdownSection {
    #[serde(default)]
    pub kill_timeout_ms: Option<u64>,
}
