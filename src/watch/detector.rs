// src/watch/detector.rs

use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;
use crate::engine::handshake::{ChangeNotifier, HandshakeError};
use crate::errors::{Result, WatchrunError};
use crate::shutdown::ShutdownSignal;
use crate::watch::debounce::Debouncer;
use crate::watch::walk::{is_dir, watched_directories};

/// What the `notify` callback forwards: an event or a per-event watch error.
pub type RawEvent = notify::Result<Event>;

/// Watches the configured tree and emits coalesced "changed" notifications.
///
/// Construction (`watch`) does all fallible setup: creating the watcher,
/// inspecting the root and registering directories. `run` is the long-lived
/// loop and only fails if the event source itself disappears.
pub struct ChangeDetector {
    events: mpsc::UnboundedReceiver<RawEvent>,
    debounce: Duration,
    notifier: ChangeNotifier,
    shutdown: ShutdownSignal,
    /// Kept alive for as long as the loop runs; dropping it closes the watch.
    watcher: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("debounce", &self.debounce)
            .field("watching", &self.watcher.is_some())
            .finish_non_exhaustive()
    }
}

impl ChangeDetector {
    /// Register watches for `config.watch` and return a detector ready to run.
    ///
    /// Every non-excluded directory gets its own non-recursive watch, so
    /// files are observed through their parent directory and excluded
    /// subtrees never produce events. A root that is a regular file is
    /// watched on its own.
    pub fn watch(
        config: &Config,
        notifier: ChangeNotifier,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<RawEvent>();

        // Runs on notify's own thread; a closed receiver only means the
        // detector loop has already returned.
        let mut watcher = RecommendedWatcher::new(
            move |res: RawEvent| {
                let _ = event_tx.send(res);
            },
            notify::Config::default(),
        )?;

        let root = &config.watch.root;
        if is_dir(root)? {
            let dirs = watched_directories(&config.watch)?;
            let mut registered = 0usize;
            for dir in &dirs {
                match watcher.watch(dir, RecursiveMode::NonRecursive) {
                    Ok(()) => registered += 1,
                    Err(err) => warn!(path = ?dir, error = %err, "could not watch directory"),
                }
            }
            info!(root = ?root, directories = registered, "file watcher started");
        } else {
            watcher.watch(root, RecursiveMode::NonRecursive)?;
            info!(file = ?root, "file watcher started on single file");
        }

        let mut detector = Self::from_events(event_rx, config.debounce, notifier, shutdown);
        detector.watcher = Some(watcher);
        Ok(detector)
    }

    /// Build a detector over an arbitrary event source instead of a live
    /// watcher. The loop ends with [`WatchrunError::EventStreamClosed`] once
    /// every sender is dropped.
    pub fn from_events(
        events: mpsc::UnboundedReceiver<RawEvent>,
        debounce: Duration,
        notifier: ChangeNotifier,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            events,
            debounce,
            notifier,
            shutdown,
            watcher: None,
        }
    }

    /// Main loop: count raw events, close a window on every tick, and hand at
    /// most one notification to the coordinator until it is acknowledged.
    ///
    /// The loop starts suppressed. The coordinator's first acknowledgement,
    /// sent once the initial build and start are done, arms it.
    pub async fn run(mut self) -> Result<()> {
        let mut debouncer = Debouncer::suppressed();
        let mut ticker = time::interval_at(Instant::now() + self.debounce, self.debounce);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(debounce = ?self.debounce, "change detector loop started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("change detector stopping");
                    break;
                }

                ack = self.notifier.acknowledged(), if debouncer.is_suppressed() => {
                    if ack.is_none() {
                        info!("coordinator gone; change detector stopping");
                        break;
                    }
                    // Whatever is still queued was caused by the restart itself.
                    let discarded = self.discard_pending_events();
                    debouncer.acknowledge();
                    debug!(discarded, "restart acknowledged; watching for changes again");
                }

                event = self.events.recv() => match event {
                    // Reads (open/close-nowrite) are not changes.
                    Some(Ok(event)) if event.kind.is_access() => {}
                    Some(Ok(event)) => {
                        if debouncer.record_event() {
                            trace!(kind = ?event.kind, paths = ?event.paths, "change recorded");
                        } else {
                            trace!(kind = ?event.kind, "change ignored while restart pending");
                        }
                    }
                    Some(Err(err)) => warn!(error = %err, "file watch error"),
                    None => {
                        error!("filesystem event stream closed");
                        return Err(WatchrunError::EventStreamClosed);
                    }
                },

                _ = ticker.tick() => {
                    if debouncer.tick() {
                        debug!("debounce window closed with changes; notifying coordinator");
                        match self.notifier.notify() {
                            Ok(()) => {}
                            Err(HandshakeError::Closed) => {
                                info!("coordinator gone; change detector stopping");
                                break;
                            }
                            Err(err @ HandshakeError::SlotOccupied) => {
                                warn!(error = %err, "dropping change notification");
                            }
                        }
                    }
                }
            }
        }

        // Closes every registered watch.
        drop(self.watcher.take());
        debug!("change detector loop finished");
        Ok(())
    }

    fn discard_pending_events(&mut self) -> usize {
        let mut discarded = 0;
        while self.events.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }
}
