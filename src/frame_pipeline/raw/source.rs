use crate::frame_pipeline::common::error::Result;
use crate::frame_pipeline::orientation::{CameraFacing, Rotation};
use crate::frame_pipeline::raw::types::RawFrame;

/// Boundary to the camera collaborator.
///
/// Device enumeration, permissions and session setup live behind this trait;
/// the pipeline only pulls frames and reads the two fixed device properties
/// that orientation correction needs.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RawFrame>;
    fn sensor_orientation(&self) -> Rotation;
    fn facing(&self) -> CameraFacing;
}
