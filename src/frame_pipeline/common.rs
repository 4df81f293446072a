//! Common utilities module
//!
//! This module contains shared utilities used across the frame pipeline.

pub mod error;
pub mod image;
pub(crate) mod rows;

pub use error::{PipelineError, Result};
pub use image::ColorImage;
