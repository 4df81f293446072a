//! Orientation correction module
//!
//! Works out how far a frame must be turned to appear upright, from the
//! sensor mounting angle, the display rotation, the camera facing and the
//! user's manual offset, and applies that turn to the decoded raster.

mod corrector;
pub mod types;

pub use corrector::{OrientationCorrector, corrected_degrees, corrected_rotation, sensor_compensation};
pub use types::{CameraFacing, OrientationState, Rotation};
