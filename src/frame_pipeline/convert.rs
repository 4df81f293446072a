//! Pixel format conversion module
//!
//! Turns 4:2:0 sensor frames into interleaved RGB(A) images. Planes are first
//! repacked into one contiguous luma-plus-chroma buffer, then decoded with
//! BT.601 coefficients.

mod bt601;
mod converter;
pub mod packing;

pub use bt601::yuv_to_rgb;
pub use converter::PixelFormatConverter;
pub use packing::{ChromaLayout, PackedYuv, pack_yuv420};
