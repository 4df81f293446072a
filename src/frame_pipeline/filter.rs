//! Image filter module
//!
//! Per-frame filters selected by [`FilterMode`]. Every filter keeps the
//! width, height and channel count of its input.

mod blur;
mod edges;
mod engine;
mod grayscale;
pub mod types;

pub use engine::FilterEngine;
pub use grayscale::luminance;
pub use types::FilterMode;
