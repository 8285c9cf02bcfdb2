mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use notify::event::{AccessKind, AccessMode, EventKind, ModifyKind};
use notify::Event;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

use watchrun::engine::{handshake, ChangeListener};
use watchrun::errors::{Result as WatchrunResult, WatchrunError};
use watchrun::shutdown::Shutdown;
use watchrun::watch::{ChangeDetector, RawEvent};

type TestResult = Result<(), Box<dyn Error>>;

const WINDOW: Duration = Duration::from_millis(600);

struct Harness {
    events: mpsc::UnboundedSender<RawEvent>,
    listener: ChangeListener,
    shutdown: Shutdown,
    task: JoinHandle<WatchrunResult<()>>,
}

/// A running detector that has already seen the startup acknowledgement.
async fn spawn_detector() -> Harness {
    let h = spawn_unarmed_detector();
    h.listener.acknowledge().expect("ack slot free");
    // Let the detector take the acknowledgement before the test sends events.
    sleep(Duration::from_millis(1)).await;
    h
}

/// A running detector still waiting for the coordinator's first acknowledgement.
fn spawn_unarmed_detector() -> Harness {
    init_tracing();
    let (events, rx) = mpsc::unbounded_channel();
    let (notifier, listener) = handshake();
    let shutdown = Shutdown::new();
    let detector = ChangeDetector::from_events(rx, WINDOW, notifier, shutdown.signal());
    Harness {
        events,
        listener,
        shutdown,
        task: tokio::spawn(detector.run()),
    }
}

fn modify(path: &str) -> RawEvent {
    Ok(Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from(path)))
}

impl Harness {
    fn burst(&self, n: usize) {
        for i in 0..n {
            self.events
                .send(modify(&format!("/w/src/file{i}.rs")))
                .expect("detector alive");
        }
    }

    /// `true` if a notification arrives within `within` (virtual time).
    async fn notified_within(&mut self, within: Duration) -> bool {
        timeout(within, self.listener.changed()).await.is_ok()
    }
}

#[tokio::test(start_paused = true)]
async fn burst_in_one_window_yields_exactly_one_notification() -> TestResult {
    let mut h = spawn_detector().await;

    h.burst(20);
    assert!(h.notified_within(WINDOW * 2).await);

    // Still unacknowledged: nothing more, however long we wait.
    h.burst(5);
    assert!(!h.notified_within(WINDOW * 20).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn quiet_tree_never_notifies() -> TestResult {
    let mut h = spawn_detector().await;

    assert!(!h.notified_within(WINDOW * 10).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn events_during_suppression_are_dropped_and_ack_rearms() -> TestResult {
    let mut h = spawn_detector().await;

    h.burst(3);
    assert!(h.notified_within(WINDOW * 2).await);

    // Let the detector consume these while suppressed.
    h.burst(3);
    sleep(Duration::from_millis(10)).await;

    h.listener.acknowledge()?;
    assert!(
        !h.notified_within(WINDOW * 10).await,
        "events seen while suppressed must not cause a second notification"
    );

    h.burst(1);
    assert!(h.notified_within(WINDOW * 2).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn watch_errors_are_not_fatal() -> TestResult {
    let mut h = spawn_detector().await;

    h.events.send(Err(notify::Error::generic("transient")))?;
    assert!(!h.notified_within(WINDOW * 3).await);
    assert!(!h.task.is_finished());

    h.burst(1);
    assert!(h.notified_within(WINDOW * 2).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancellation_terminates_even_while_suppressed() -> TestResult {
    let mut h = spawn_detector().await;

    h.burst(1);
    assert!(h.notified_within(WINDOW * 2).await);

    h.shutdown.trigger();
    timeout(WINDOW, h.task).await???;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn closed_event_stream_is_fatal_to_detector() -> TestResult {
    let h = spawn_detector().await;

    drop(h.events);
    let result = timeout(WINDOW, h.task).await??;
    assert!(matches!(result, Err(WatchrunError::EventStreamClosed)));

    // The detector does not trigger shutdown itself; escalation is the
    // caller's job (see `watchrun::drive`).
    assert!(!h.shutdown.is_triggered());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropped_listener_ends_detector_cleanly() -> TestResult {
    let h = spawn_detector().await;

    drop(h.listener);
    h.events.send(modify("/w/src/main.rs"))?;

    timeout(WINDOW * 3, h.task).await???;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn read_access_is_not_a_change() -> TestResult {
    let mut h = spawn_detector().await;

    let read = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Read)))
        .add_path(PathBuf::from("/w/src/main.rs"));
    h.events.send(Ok(read))?;
    assert!(!h.notified_within(WINDOW * 3).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn changes_before_first_acknowledgement_are_ignored() -> TestResult {
    let mut h = spawn_unarmed_detector();

    // The initial build writing into the tree.
    h.burst(4);
    assert!(!h.notified_within(WINDOW * 5).await);

    h.listener.acknowledge()?;
    sleep(Duration::from_millis(1)).await;
    assert!(!h.notified_within(WINDOW * 5).await);

    h.burst(1);
    assert!(h.notified_within(WINDOW * 2).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn events_queued_alongside_the_ack_are_discarded() -> TestResult {
    let mut h = spawn_detector().await;

    h.burst(2);
    assert!(h.notified_within(WINDOW * 2).await);

    // Restart output still in the queue when the acknowledgement lands.
    h.burst(3);
    h.listener.acknowledge()?;
    assert!(
        !h.notified_within(WINDOW * 10).await,
        "events produced by the restart must not trigger another one"
    );

    h.burst(1);
    assert!(h.notified_within(WINDOW * 2).await);

    h.shutdown.trigger();
    h.task.await??;
    Ok(())
}
