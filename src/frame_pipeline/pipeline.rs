//! Frame processing pipeline module
//!
//! Chains conversion, filtering and orientation correction for one raw frame
//! and carries the configuration and timing support around them.

mod config;
mod processor;
mod snapshot;
mod timing;


pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use processor::{FramePipeline, FrameProcessor};
pub use snapshot::PipelineSnapshot;
pub use timing::{PipelineTimings, Stage, StepTiming, Timer};
