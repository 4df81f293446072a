//! Frame scheduling module
//!
//! Moves frames between the three roles of a camera session: the capture
//! callback that hands raw frames in, the processing thread that runs the
//! pipeline, and the presentation side that shows the result. At most one
//! frame is in flight; frames arriving while one is processed or presented
//! are dropped.

mod frame_scheduler;
mod gate;
mod presenter;
mod state;


pub use frame_scheduler::{FrameScheduler, FrameSubmitter};
pub use presenter::{FrameSink, PresentationQueue, PresentationThread, PresentedFrame, Presenter};
pub use state::{FrameDisposition, SchedulerState, SchedulerStats};
