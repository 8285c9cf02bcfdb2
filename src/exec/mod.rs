// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] builds `tokio::process::Command`s for the build and run
//!   steps and knows how to terminate a child.
//! - [`supervisor`] owns the zero-or-one managed run process and composes
//!   stop, build and start into `restart`.

pub mod command;
pub mod supervisor;

pub use supervisor::Supervisor;
