// src/engine/mod.rs

//! Coordination between change detection and the process supervisor.
//!
//! - [`handshake`] is the single-slot notify/acknowledge pair linking the
//!   detector task to the coordinator task.
//! - [`coordinator`] owns the [`crate::exec::Supervisor`] and runs exactly one
//!   restart per notification, acknowledging only once the restart returned.

pub mod coordinator;
pub mod handshake;

pub use coordinator::Coordinator;
pub use handshake::{handshake, ChangeListener, ChangeNotifier, HandshakeError};
