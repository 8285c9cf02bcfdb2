// src/engine/coordinator.rs

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::handshake::ChangeListener;
use crate::exec::Supervisor;
use crate::shutdown::ShutdownSignal;

/// Turns change notifications into supervisor restarts.
///
/// Notifications are handled strictly one at a time: `restart` runs to
/// completion before the acknowledgement goes back to the detector, which is
/// what keeps two restarts from ever overlapping.
#[derive(Debug)]
pub struct Coordinator {
    supervisor: Supervisor,
    listener: ChangeListener,
    shutdown: ShutdownSignal,
}

impl Coordinator {
    pub fn new(config: &Config, listener: ChangeListener, shutdown: ShutdownSignal) -> Self {
        Self::with_supervisor(Supervisor::new(config), listener, shutdown)
    }

    pub fn with_supervisor(
        supervisor: Supervisor,
        listener: ChangeListener,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            supervisor,
            listener,
            shutdown,
        }
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Main loop.
    ///
    /// - Builds and starts the run command once up front, then acknowledges
    ///   so the detector starts counting changes.
    /// - On every notification: restart, then acknowledge.
    /// - On shutdown (or if the detector goes away): stop the run command
    ///   exactly once and return.
    pub async fn run(&mut self) {
        info!("coordinator started");
        self.supervisor.start().await;
        // Arms the detector, which starts out suppressed.
        self.acknowledge();

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("shutdown requested; stopping run command");
                    break;
                }

                changed = self.listener.changed() => {
                    if changed.is_none() {
                        warn!("change detector gone; stopping run command");
                        break;
                    }

                    info!("changes detected; restarting");
                    self.supervisor.restart().await;
                    self.acknowledge();
                }
            }
        }

        self.supervisor.stop_run().await;
        info!("coordinator finished");
    }

    fn acknowledge(&self) {
        if let Err(err) = self.listener.acknowledge() {
            debug!(error = %err, "could not acknowledge restart");
        }
    }
}
