// src/watch/mod.rs

//! Directory change detection.
//!
//! This module is responsible for:
//! - Enumerating the directories to register under the watch root, pruning
//!   excluded subtrees ([`walk`]).
//! - The pure debounce/suppression state machine ([`debounce`]).
//! - The async detector task that drives a `notify` watcher through that
//!   state machine and emits at most one "changed" signal per window
//!   ([`detector`]).
//!
//! It knows nothing about builds or processes; it only turns filesystem
//! activity into coalesced notifications.

pub mod debounce;
pub mod detector;
pub mod walk;

pub use debounce::{DebounceState, Debouncer};
pub use detector::{ChangeDetector, RawEvent};
pub use walk::watched_directories;
