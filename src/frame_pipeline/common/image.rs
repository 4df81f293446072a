//! Decoded raster type shared by every stage after conversion

use crate::frame_pipeline::common::error::{PipelineError, Result};

/// Interleaved 8-bit raster: RGB, RGBA or single-channel luminance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel (1, 3 or 4)
    pub channels: usize,
    /// Pixel data, row-major, no row padding
    pub data: Vec<u8>,
}

impl ColorImage {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        let image = Self {
            width,
            height,
            channels,
            data,
        };
        image.validate()?;
        Ok(image)
    }

    /// Image where every pixel holds `pixel`; the channel count is `pixel.len()`.
    pub fn filled(width: usize, height: usize, pixel: &[u8]) -> Result<Self> {
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width * height * pixel.len())
            .collect();
        Self::new(width, height, pixel.len(), data)
    }

    /// Checks the structural invariants every stage relies on.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidImage(format!(
                "empty raster {}x{}",
                self.width, self.height
            )));
        }
        if !matches!(self.channels, 1 | 3 | 4) {
            return Err(PipelineError::InvalidImage(format!(
                "unsupported channel count {}",
                self.channels
            )));
        }
        let expected = self.width * self.height * self.channels;
        if self.data.len() != expected {
            return Err(PipelineError::InvalidImage(format!(
                "data length {} does not match {}x{}x{} = {}",
                self.data.len(),
                self.width,
                self.height,
                self.channels,
                expected
            )));
        }
        Ok(())
    }

    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Address of the pixel buffer, used to tell pass-through stages from copies.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_image() {
        let image = ColorImage::filled(3, 2, &[1, 2, 3]).unwrap();
        assert_eq!(image.channels, 3);
        assert_eq!(image.data.len(), 18);
        assert_eq!(image.pixel(2, 1), &[1, 2, 3]);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let result = ColorImage::new(0, 4, 3, Vec::new());
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }

    #[test]
    fn test_rejects_two_channels() {
        let result = ColorImage::new(2, 2, 2, vec![0; 8]);
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let result = ColorImage::new(4, 4, 3, vec![0; 47]);
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }
}
