use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    held: usize,
}

/// Session admission plus a count of raw frames the pipeline still holds.
///
/// Admission and teardown share one lock, so once `close_and_drain` returns
/// no frame from the closed session is alive and none can be admitted.
#[derive(Debug, Default)]
pub(crate) struct SessionGate {
    state: Mutex<GateState>,
    drained: Condvar,
    epoch: AtomicU64,
}

impl SessionGate {
    /// Opens a session; returns its epoch.
    pub(crate) fn open(&self) -> u64 {
        let mut state = self.state.lock();
        state.open = true;
        self.epoch.load(Ordering::Acquire)
    }

    /// Counts one more held frame if a session is open; returns its epoch.
    pub(crate) fn admit(&self) -> Option<u64> {
        let mut state = self.state.lock();
        if !state.open {
            return None;
        }
        state.held += 1;
        Some(self.epoch.load(Ordering::Acquire))
    }

    pub(crate) fn release_one(&self) {
        let mut state = self.state.lock();
        state.held = state.held.saturating_sub(1);
        if state.held == 0 {
            self.drained.notify_all();
        }
    }

    /// Stops admitting frames and blocks until every held frame is released.
    /// Must not be called from the processing thread.
    pub(crate) fn close_and_drain(&self) -> bool {
        let mut state = self.state.lock();
        let was_open = state.open;
        state.open = false;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        if state.held > 0 {
            debug!(held = state.held, "Waiting for raw frames to be released");
        }
        while state.held > 0 {
            self.drained.wait(&mut state);
        }
        was_open
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state.lock().open
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn held(&self) -> usize {
        self.state.lock().held
    }
}
