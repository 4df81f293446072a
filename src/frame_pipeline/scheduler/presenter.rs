//! Hand-off of finished frames to the presentation side

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, info, warn};

use crate::frame_pipeline::common::{ColorImage, PipelineError, Result};
use crate::frame_pipeline::scheduler::frame_scheduler::InFlightTicket;

/// The shell's display callback.
///
/// Called on the presentation thread once per processed frame. The image is
/// only borrowed for the duration of the call.
pub trait FrameSink {
    fn on_frame_ready(&mut self, image: &ColorImage, width: usize, height: usize);
}

impl<F> FrameSink for F
where
    F: FnMut(&ColorImage, usize, usize),
{
    fn on_frame_ready(&mut self, image: &ColorImage, width: usize, height: usize) {
        self(image, width, height)
    }
}

/// A finished frame on its way to the sink. The scheduler treats the frame
/// as in flight until this value has been dispatched or dropped.
pub struct PresentedFrame {
    image: ColorImage,
    sequence: u64,
    epoch: u64,
    ticket: InFlightTicket,
}

impl PresentedFrame {
    pub(crate) fn new(image: ColorImage, sequence: u64, epoch: u64, ticket: InFlightTicket) -> Self {
        Self {
            image,
            sequence,
            epoch,
            ticket,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    /// Shows the frame on `sink` and frees the in-flight slot. A frame whose
    /// session was closed after it was queued is dropped instead; returns
    /// whether the sink was called.
    pub fn dispatch<S: FrameSink + ?Sized>(self, sink: &mut S) -> bool {
        if !self.ticket.is_current(self.epoch) {
            debug!(sequence = self.sequence, "Session closed while queued, discarding frame");
            self.ticket.discarded();
            return false;
        }
        let (width, height) = self.image.dimensions();
        sink.on_frame_ready(&self.image, width, height);
        self.ticket.presented();
        true
    }
}

/// Posting side of the presentation channel; never blocks.
#[derive(Clone)]
pub struct Presenter {
    tx: Sender<PresentedFrame>,
}

impl Presenter {
    /// Presenter drained by a UI loop the shell already runs.
    pub fn queue() -> (Presenter, PresentationQueue) {
        let (tx, rx) = unbounded();
        (Presenter { tx }, PresentationQueue { rx })
    }

    /// Presenter with its own thread calling `sink`.
    pub fn spawn<S>(name: &str, mut sink: S) -> Result<(Presenter, PresentationThread)>
    where
        S: FrameSink + Send + 'static,
    {
        let (presenter, queue) = Self::queue();
        let thread_name = name.to_string();
        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                debug!(name = %thread_name, "Presentation thread started");
                while queue.dispatch_next(&mut sink, None) {}
                info!(name = %thread_name, "Presentation thread exiting");
            })
            .map_err(|e| PipelineError::WorkerSpawn(format!("{name}: {e}")))?;
        Ok((
            presenter,
            PresentationThread {
                handle: Some(handle),
                name: name.to_string(),
            },
        ))
    }

    /// Returns false when nothing is listening any more; the frame is dropped.
    pub(crate) fn post(&self, frame: PresentedFrame) -> bool {
        self.tx.send(frame).is_ok()
    }
}

/// Receiving side for shells that present from their own UI loop
pub struct PresentationQueue {
    rx: Receiver<PresentedFrame>,
}

impl PresentationQueue {
    /// Dispatches everything already posted without waiting; returns how
    /// many frames reached the sink.
    pub fn dispatch_pending<S: FrameSink + ?Sized>(&self, sink: &mut S) -> usize {
        let mut count = 0;
        while let Ok(frame) = self.rx.try_recv() {
            if frame.dispatch(sink) {
                count += 1;
            }
        }
        count
    }

    /// Waits for one frame, up to `timeout` if given, and dispatches it.
    /// Returns false on timeout or once every presenter is gone; a received
    /// frame counts even when it was discarded as stale.
    pub fn dispatch_next<S: FrameSink + ?Sized>(
        &self,
        sink: &mut S,
        timeout: Option<Duration>,
    ) -> bool {
        let frame = match timeout {
            Some(timeout) => self.rx.recv_timeout(timeout).ok(),
            None => self.rx.recv().ok(),
        };
        match frame {
            Some(frame) => {
                frame.dispatch(sink);
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Dedicated presentation thread; exits once every [`Presenter`] is dropped.
/// Dropping this handle detaches the thread.
pub struct PresentationThread {
    handle: Option<JoinHandle<()>>,
    name: String,
}

impl PresentationThread {
    /// Blocks until the thread has drained its queue and exited.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                warn!(name = %self.name, "Presentation thread panicked: {:?}", e);
            }
        }
    }
}
