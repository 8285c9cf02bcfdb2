// src/watch/debounce.rs

//! Pure debounce/suppression state machine behind the change detector.
//!
//! The detector feeds it three inputs (raw event, periodic tick,
//! acknowledgement) and only performs IO when [`Debouncer::tick`] says a
//! notification is due. Keeping this free of channels and timers lets the
//! coalescing rules be tested directly.

/// Phase of the detector between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No events since the last tick (or since the last acknowledgement).
    Idle,
    /// At least one event arrived in the current window.
    Accumulating { events: usize },
    /// A notification is outstanding; events are ignored until it is
    /// acknowledged.
    Suppressed,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    state: DebounceState,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            state: DebounceState::Idle,
        }
    }

    /// Start with a notification already outstanding. The initial build and
    /// start stand in for it, so nothing they write counts as a change.
    pub fn suppressed() -> Self {
        Self {
            state: DebounceState::Suppressed,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_suppressed(&self) -> bool {
        self.state == DebounceState::Suppressed
    }

    /// Count one raw event. Returns `false` when the event was ignored
    /// because a notification is still outstanding.
    pub fn record_event(&mut self) -> bool {
        self.state = match self.state {
            DebounceState::Idle => DebounceState::Accumulating { events: 1 },
            DebounceState::Accumulating { events } => DebounceState::Accumulating {
                events: events.saturating_add(1),
            },
            DebounceState::Suppressed => return false,
        };
        true
    }

    /// Close the current window. Returns `true` exactly when a notification
    /// must be emitted; the machine is then suppressed.
    ///
    /// Windows are fixed, not rolling: a burst that straddles a tick can
    /// produce a second notification once the first has been acknowledged.
    pub fn tick(&mut self) -> bool {
        match self.state {
            DebounceState::Accumulating { .. } => {
                self.state = DebounceState::Suppressed;
                true
            }
            DebounceState::Idle | DebounceState::Suppressed => false,
        }
    }

    /// The outstanding notification was handled; start accepting events again.
    pub fn acknowledge(&mut self) {
        if self.state == DebounceState::Suppressed {
            self.state = DebounceState::Idle;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
