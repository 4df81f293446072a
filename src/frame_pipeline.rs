//! Camera frame processing pipeline
//!
//! Raw 4:2:0 sensor frames are converted to RGB, optionally filtered,
//! turned upright and handed to a presentation callback, one frame in
//! flight at a time.

pub mod common;
pub mod convert;
pub mod filter;
pub mod orientation;
pub mod pipeline;
pub mod raw;
pub mod scheduler;

pub use common::{ColorImage, PipelineError, Result};

pub use raw::{FrameSource, Plane, RawFrame, SyntheticCamera};

pub use convert::{ChromaLayout, PackedYuv, PixelFormatConverter, pack_yuv420};

pub use filter::{FilterEngine, FilterMode};

pub use orientation::{
    CameraFacing, OrientationCorrector, OrientationState, Rotation, corrected_degrees,
    corrected_rotation,
};

pub use pipeline::{
    FramePipeline, FrameProcessor, PipelineConfig, PipelineConfigBuilder, PipelineSnapshot,
    PipelineTimings,
};

pub use scheduler::{
    FrameDisposition, FrameScheduler, FrameSink, FrameSubmitter, PresentationQueue, Presenter,
    SchedulerState, SchedulerStats,
};
