// src/engine/handshake.rs

//! Two-phase notify/acknowledge handshake between detector and coordinator.
//!
//! Both directions are single-capacity channels. The detector never has more
//! than one notification outstanding because it suppresses itself until the
//! acknowledgement arrives, so `notify` finding the slot occupied indicates a
//! protocol violation rather than back-pressure.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("previous notification has not been consumed")]
    SlotOccupied,

    #[error("other side of the handshake is gone")]
    Closed,
}

/// Detector side: emits "changed", waits for the acknowledgement.
#[derive(Debug)]
pub struct ChangeNotifier {
    notify_tx: mpsc::Sender<()>,
    ack_rx: mpsc::Receiver<()>,
}

/// Coordinator side: receives "changed", sends the acknowledgement.
#[derive(Debug)]
pub struct ChangeListener {
    notify_rx: mpsc::Receiver<()>,
    ack_tx: mpsc::Sender<()>,
}

/// Create a connected notifier/listener pair.
pub fn handshake() -> (ChangeNotifier, ChangeListener) {
    let (notify_tx, notify_rx) = mpsc::channel(1);
    let (ack_tx, ack_rx) = mpsc::channel(1);
    (
        ChangeNotifier { notify_tx, ack_rx },
        ChangeListener { notify_rx, ack_tx },
    )
}

fn map_send_error(err: TrySendError<()>) -> HandshakeError {
    match err {
        TrySendError::Full(()) => HandshakeError::SlotOccupied,
        TrySendError::Closed(()) => HandshakeError::Closed,
    }
}

impl ChangeNotifier {
    /// Place a notification in the slot without blocking.
    pub fn notify(&self) -> Result<(), HandshakeError> {
        self.notify_tx.try_send(()).map_err(map_send_error)
    }

    /// Wait for the acknowledgement. `None` once the listener is dropped.
    pub async fn acknowledged(&mut self) -> Option<()> {
        self.ack_rx.recv().await
    }
}

impl ChangeListener {
    /// Wait for the next notification. `None` once the notifier is dropped.
    pub async fn changed(&mut self) -> Option<()> {
        self.notify_rx.recv().await
    }

    /// Tell the detector the last notification has been fully handled.
    pub fn acknowledge(&self) -> Result<(), HandshakeError> {
        self.ack_tx.try_send(()).map_err(map_send_error)
    }
}
