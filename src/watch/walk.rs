// src/watch/walk.rs

//! Enumeration of the directories that receive a watch.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::WatchRoot;
use crate::errors::{Result, WatchrunError};

/// Collect `watch.root` and every directory beneath it, skipping excluded
/// subtrees entirely.
///
/// Only the root itself must be readable. A subdirectory that cannot be read
/// is still returned but not descended into. Symlinked directories are not
/// followed.
pub fn watched_directories(watch: &WatchRoot) -> Result<Vec<PathBuf>> {
    let root = &watch.root;
    if watch.is_excluded(root) {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let pruned = entry.depth() > 0 && watch.is_excluded(entry.path());
            if pruned {
                trace!(path = ?entry.path(), "excluded subtree");
            }
            !pruned
        });

    let mut dirs = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(err) if err.depth() == 0 => {
                return Err(WatchrunError::InvalidWatchPath {
                    path: root.clone(),
                    source: err.into(),
                });
            }
            Err(err) => {
                debug!(path = ?err.path(), error = %err, "skipping unreadable entry");
            }
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// `true` when `path` is a directory (following symlinks).
pub(crate) fn is_dir(path: &Path) -> Result<bool> {
    let meta = fs::metadata(path).map_err(|source| WatchrunError::InvalidWatchPath {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(meta.is_dir())
}
