//! Raw frame module
//!
//! This module describes sensor frames as delivered by the camera collaborator:
//! planar luma/chroma buffers with row and pixel strides, plus the capability
//! to hand the backing buffer back to the camera subsystem.

mod source;
mod synthetic_source;
pub mod types;

pub use source::FrameSource;
pub use synthetic_source::SyntheticCamera;
pub use types::{Plane, RawFrame};
