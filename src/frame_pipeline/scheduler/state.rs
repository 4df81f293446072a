//! Scheduler state and counters

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

/// Where a camera session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No session; incoming frames are dropped
    Idle,
    /// Session open, nothing in flight
    Capturing,
    /// A frame is on the processing thread
    Processing,
    /// A finished frame is waiting for or inside the presentation callback
    Presenting,
}

/// What happened to a frame handed to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    Accepted,
    /// Another frame was still being processed or presented
    DroppedBusy,
    /// No session was open
    DroppedIdle,
    /// The processing thread has shut down
    WorkerStopped,
}

const STAGE_PROCESSING: u8 = 0;
const STAGE_PRESENTING: u8 = 1;

/// Stage of the in-flight frame, only meaningful while one exists
#[derive(Debug)]
pub(crate) struct InFlightStage(AtomicU8);

impl InFlightStage {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(STAGE_PROCESSING))
    }

    pub(crate) fn processing(&self) {
        self.0.store(STAGE_PROCESSING, Ordering::Release);
    }

    pub(crate) fn presenting(&self) {
        self.0.store(STAGE_PRESENTING, Ordering::Release);
    }

    pub(crate) fn as_state(&self) -> SchedulerState {
        match self.0.load(Ordering::Acquire) {
            STAGE_PRESENTING => SchedulerState::Presenting,
            _ => SchedulerState::Processing,
        }
    }
}

/// Point-in-time copy of the scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub accepted: u64,
    pub dropped_busy: u64,
    pub dropped_idle: u64,
    pub failed: u64,
    pub presented: u64,
    pub discarded_stale: u64,
    pub worker_stopped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub(crate) submitted: AtomicU64,
    pub(crate) accepted: AtomicU64,
    pub(crate) dropped_busy: AtomicU64,
    pub(crate) dropped_idle: AtomicU64,
    pub(crate) failed: AtomicU64,
    pub(crate) presented: AtomicU64,
    pub(crate) discarded_stale: AtomicU64,
    pub(crate) worker_stopped: AtomicU64,
}

impl SchedulerCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped_busy: self.dropped_busy.load(Ordering::Relaxed),
            dropped_idle: self.dropped_idle.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            presented: self.presented.load(Ordering::Relaxed),
            discarded_stale: self.discarded_stale.load(Ordering::Relaxed),
            worker_stopped: self.worker_stopped.load(Ordering::Relaxed),
        }
    }
}
