use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select};
use tracing::{debug, error, info, trace, warn};

use crate::frame_pipeline::common::{PipelineError, Result};
use crate::frame_pipeline::filter::FilterMode;
use crate::frame_pipeline::orientation::{CameraFacing, Rotation};
use crate::frame_pipeline::pipeline::{FrameProcessor, PipelineConfig, PipelineSnapshot};
use crate::frame_pipeline::raw::RawFrame;
use crate::frame_pipeline::scheduler::gate::SessionGate;
use crate::frame_pipeline::scheduler::presenter::{
    FrameSink, PresentationThread, PresentedFrame, Presenter,
};
use crate::frame_pipeline::scheduler::state::{
    FrameDisposition, InFlightStage, SchedulerCounters, SchedulerState, SchedulerStats,
};

struct SchedulerShared {
    gate: SessionGate,
    in_flight: AtomicBool,
    stage: InFlightStage,
    snapshot: ArcSwap<PipelineSnapshot>,
    counters: SchedulerCounters,
}

/// Holds the single in-flight slot; dropping it frees the slot.
pub(crate) struct InFlightTicket {
    shared: Arc<SchedulerShared>,
}

impl InFlightTicket {
    /// Takes the slot if nobody holds it.
    fn try_acquire(shared: &Arc<SchedulerShared>) -> Option<Self> {
        shared
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        shared.stage.processing();
        Some(Self {
            shared: Arc::clone(shared),
        })
    }

    /// Whether the frame still belongs to the open session.
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.shared.gate.epoch() == epoch
    }

    pub(crate) fn presented(self) {
        SchedulerCounters::bump(&self.shared.counters.presented);
    }

    pub(crate) fn discarded(self) {
        SchedulerCounters::bump(&self.shared.counters.discarded_stale);
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.shared.in_flight.store(false, Ordering::Release);
    }
}

struct Job {
    frame: RawFrame,
    epoch: u64,
    ticket: InFlightTicket,
}

/// Cloneable entry point for the capture callback thread
#[derive(Clone)]
pub struct FrameSubmitter {
    shared: Arc<SchedulerShared>,
    jobs: Sender<Job>,
}

impl FrameSubmitter {
    /// Hands a new raw frame to the pipeline without blocking on processing.
    ///
    /// The frame is dropped, and so released, right away when no session is
    /// open or when another frame is still being processed or presented.
    pub fn on_raw_frame_available(&self, frame: RawFrame) -> FrameDisposition {
        let shared = &self.shared;
        let counters = &shared.counters;
        SchedulerCounters::bump(&counters.submitted);
        let sequence = frame.sequence();

        let Some(epoch) = shared.gate.admit() else {
            SchedulerCounters::bump(&counters.dropped_idle);
            trace!(sequence, "No open session, dropping frame");
            return FrameDisposition::DroppedIdle;
        };
        let gate_owner = Arc::clone(shared);
        let frame = frame.on_release(move || gate_owner.gate.release_one());

        let Some(ticket) = InFlightTicket::try_acquire(shared) else {
            SchedulerCounters::bump(&counters.dropped_busy);
            trace!(sequence, "Pipeline busy, dropping frame");
            return FrameDisposition::DroppedBusy;
        };

        match self.jobs.try_send(Job {
            frame,
            epoch,
            ticket,
        }) {
            Ok(()) => {
                SchedulerCounters::bump(&counters.accepted);
                FrameDisposition::Accepted
            }
            Err(TrySendError::Full(_)) => {
                SchedulerCounters::bump(&counters.dropped_busy);
                FrameDisposition::DroppedBusy
            }
            Err(TrySendError::Disconnected(_)) => {
                SchedulerCounters::bump(&counters.worker_stopped);
                warn!(sequence, "Processing thread gone, dropping frame");
                FrameDisposition::WorkerStopped
            }
        }
    }
}

/// Runs the frame pipeline for one camera at a time.
///
/// Owns the processing thread and, when built with
/// [`FrameScheduler::spawn_with_sink`], the presentation thread as well.
/// Filter and orientation changes are published as one snapshot that the
/// processing thread picks up at the start of the next frame.
pub struct FrameScheduler {
    submitter: FrameSubmitter,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    presentation: Option<PresentationThread>,
    config: PipelineConfig,
}

impl FrameScheduler {
    /// Starts the processing thread. Finished frames go to `presenter`.
    /// The scheduler starts [`SchedulerState::Idle`]; call
    /// [`FrameScheduler::open_session`] once the camera is running.
    pub fn start<P: FrameProcessor>(
        config: PipelineConfig,
        processor: P,
        presenter: Presenter,
        initial: PipelineSnapshot,
    ) -> Result<Self> {
        let shared = Arc::new(SchedulerShared {
            gate: SessionGate::default(),
            in_flight: AtomicBool::new(false),
            stage: InFlightStage::new(),
            snapshot: ArcSwap::from_pointee(initial),
            counters: SchedulerCounters::default(),
        });
        let (jobs_tx, jobs_rx) = bounded::<Job>(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let worker_shared = Arc::clone(&shared);
        let name = config.worker_thread_name.clone();
        let worker = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                run_worker(&name, &worker_shared, &processor, &presenter, jobs_rx, shutdown_rx)
            })
            .map_err(|e| {
                PipelineError::WorkerSpawn(format!("{}: {}", config.worker_thread_name, e))
            })?;

        info!(worker = %config.worker_thread_name, "Frame scheduler started");
        Ok(Self {
            submitter: FrameSubmitter {
                shared,
                jobs: jobs_tx,
            },
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
            presentation: None,
            config,
        })
    }

    /// Starts both threads, presenting through `sink` on a dedicated thread.
    pub fn spawn_with_sink<P, S>(
        config: PipelineConfig,
        processor: P,
        sink: S,
        initial: PipelineSnapshot,
    ) -> Result<Self>
    where
        P: FrameProcessor,
        S: FrameSink + Send + 'static,
    {
        let (presenter, presentation) = Presenter::spawn(&config.presenter_thread_name, sink)?;
        let mut scheduler = Self::start(config, processor, presenter, initial)?;
        scheduler.presentation = Some(presentation);
        Ok(scheduler)
    }

    fn shared(&self) -> &SchedulerShared {
        &self.submitter.shared
    }

    pub fn submitter(&self) -> FrameSubmitter {
        self.submitter.clone()
    }

    pub fn on_raw_frame_available(&self, frame: RawFrame) -> FrameDisposition {
        self.submitter.on_raw_frame_available(frame)
    }

    pub fn open_session(&self) {
        let epoch = self.shared().gate.open();
        info!(epoch, "Camera session opened");
    }

    /// Stops accepting frames and waits until the pipeline holds no raw
    /// frame any more. Results still on their way from the closed session
    /// are discarded. Do not call from inside a [`FrameProcessor`].
    pub fn close_session(&self) {
        if self.shared().gate.close_and_drain() {
            info!("Camera session closed");
        }
    }

    /// Closes the session, switches facing and sensor mounting, reopens.
    pub fn switch_camera(&self, facing: CameraFacing, sensor_orientation: Rotation) {
        self.close_session();
        self.update(|snapshot| {
            snapshot.orientation.facing = facing;
            snapshot.orientation.sensor_orientation = sensor_orientation;
        });
        info!(?facing, sensor = sensor_orientation.degrees(), "Switched camera");
        self.open_session();
    }

    fn update(&self, mut change: impl FnMut(&mut PipelineSnapshot)) -> PipelineSnapshot {
        let mut next = PipelineSnapshot::default();
        self.shared().snapshot.rcu(|current| {
            next = **current;
            change(&mut next);
            next
        });
        next
    }

    pub fn set_filter_mode(&self, filter: FilterMode) {
        self.update(|snapshot| snapshot.filter = filter);
        debug!(filter = filter.name(), "Filter selected");
    }

    /// Advances the manual rotation by 90 degrees, wrapping at 360.
    pub fn rotate_manual(&self) -> Rotation {
        let snapshot = self.update(|snapshot| {
            snapshot.orientation.manual_rotation =
                snapshot.orientation.manual_rotation.next_clockwise();
        });
        let rotation = snapshot.orientation.manual_rotation;
        info!(degrees = rotation.degrees(), "Manual rotation");
        rotation
    }

    pub fn set_camera_facing(&self, facing: CameraFacing) {
        self.update(|snapshot| snapshot.orientation.facing = facing);
    }

    pub fn set_sensor_orientation(&self, rotation: Rotation) {
        self.update(|snapshot| snapshot.orientation.sensor_orientation = rotation);
    }

    pub fn set_display_rotation(&self, rotation: Rotation) {
        self.update(|snapshot| snapshot.orientation.display_rotation = rotation);
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        **self.shared().snapshot.load()
    }

    pub fn state(&self) -> SchedulerState {
        let shared = self.shared();
        if !shared.gate.is_open() {
            SchedulerState::Idle
        } else if shared.in_flight.load(Ordering::Acquire) {
            shared.stage.as_state()
        } else {
            SchedulerState::Capturing
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        self.shared().counters.snapshot()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Closes the session and stops both threads.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.close_session();
        // dropping the sender wakes the worker's select
        self.shutdown.take();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.join() {
                warn!("Processing thread panicked: {:?}", e);
            }
        }
        if let Some(presentation) = self.presentation.take() {
            presentation.join();
        }
        info!(stats = ?self.stats(), "Frame scheduler stopped");
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

fn run_worker<P: FrameProcessor>(
    name: &str,
    shared: &Arc<SchedulerShared>,
    processor: &P,
    presenter: &Presenter,
    jobs: Receiver<Job>,
    shutdown: Receiver<()>,
) {
    debug!(name, "Processing thread started");
    loop {
        select! {
            recv(jobs) -> job => match job {
                Ok(job) => process_job(shared, processor, presenter, job),
                Err(_) => break,
            },
            recv(shutdown) -> _ => break,
        }
    }
    info!(name, "Processing thread exiting");
}

fn process_job<P: FrameProcessor>(
    shared: &Arc<SchedulerShared>,
    processor: &P,
    presenter: &Presenter,
    job: Job,
) {
    let Job {
        frame,
        epoch,
        ticket,
    } = job;
    let sequence = frame.sequence();
    let snapshot = **shared.snapshot.load();

    let outcome = catch_unwind(AssertUnwindSafe(|| processor.process(frame, &snapshot)));
    let image = match outcome {
        Ok(Ok(image)) => image,
        Ok(Err(e)) => {
            SchedulerCounters::bump(&shared.counters.failed);
            warn!(sequence, error = %e, "Dropping frame");
            return;
        }
        Err(_) => {
            SchedulerCounters::bump(&shared.counters.failed);
            error!(sequence, "Frame processor panicked, dropping frame");
            return;
        }
    };

    if !ticket.is_current(epoch) {
        debug!(sequence, "Session changed during processing, discarding result");
        ticket.discarded();
        return;
    }

    shared.stage.presenting();
    if !presenter.post(PresentedFrame::new(image, sequence, epoch, ticket)) {
        warn!(sequence, "Presentation side gone, dropping frame");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_pipeline::raw::Plane;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_frame_for_stopped_worker_is_counted_and_released() {
        let shared = Arc::new(SchedulerShared {
            gate: SessionGate::default(),
            in_flight: AtomicBool::new(false),
            stage: InFlightStage::new(),
            snapshot: ArcSwap::from_pointee(PipelineSnapshot::default()),
            counters: SchedulerCounters::default(),
        });
        shared.gate.open();
        let (jobs, worker_side) = bounded::<Job>(1);
        drop(worker_side);
        let submitter = FrameSubmitter {
            shared: Arc::clone(&shared),
            jobs,
        };

        let releases = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&releases);
        let frame = RawFrame::new(2, 2, vec![Plane::packed(vec![0; 4], 2)])
            .with_release(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let disposition = submitter.on_raw_frame_available(frame);

        assert_eq!(disposition, FrameDisposition::WorkerStopped);
        assert_eq!(shared.counters.snapshot().worker_stopped, 1);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(!shared.in_flight.load(Ordering::SeqCst));
        assert_eq!(shared.gate.held(), 0);
    }
}
