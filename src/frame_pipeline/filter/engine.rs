use tracing::debug;

use crate::frame_pipeline::common::{ColorImage, Result};
use crate::frame_pipeline::filter::types::FilterMode;
use crate::frame_pipeline::filter::{blur, edges, grayscale};

/// Dispatches a [`FilterMode`] to its implementation
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine {
    parallel: bool,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl FilterEngine {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Applies `mode` to `image`.
    ///
    /// `Identity` returns the input itself, no copy. Other modes allocate a
    /// new image with the same width, height and channel count.
    pub fn apply(&self, mode: FilterMode, image: ColorImage) -> Result<ColorImage> {
        image.validate()?;
        debug!(
            filter = mode.name(),
            width = image.width,
            height = image.height,
            channels = image.channels,
            "Applying filter"
        );
        match mode {
            FilterMode::Identity => Ok(image),
            FilterMode::Grayscale => grayscale::grayscale(&image, self.parallel),
            FilterMode::Blur => blur::gaussian_blur(&image, self.parallel),
            FilterMode::EdgeDetect => edges::detect_edges(&image, self.parallel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_pipeline::common::PipelineError;

    fn gradient(width: usize, height: usize, channels: usize) -> ColorImage {
        let data = (0..width * height * channels)
            .map(|i| ((i * 37) % 256) as u8)
            .collect();
        ColorImage::new(width, height, channels, data).unwrap()
    }

    #[test]
    fn test_every_mode_preserves_shape() {
        let engine = FilterEngine::default();
        for channels in [1, 3, 4] {
            for mode in FilterMode::ALL {
                let input = gradient(9, 6, channels);
                let output = engine.apply(mode, input).unwrap();
                assert_eq!(output.dimensions(), (9, 6), "{mode:?}");
                assert_eq!(output.channels, channels, "{mode:?}");
            }
        }
    }

    #[test]
    fn test_identity_is_zero_copy() {
        let input = gradient(8, 8, 3);
        let ptr = input.as_ptr();
        let output = FilterEngine::default()
            .apply(FilterMode::Identity, input)
            .unwrap();
        assert_eq!(output.as_ptr(), ptr);
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let engine = FilterEngine::default();
        let once = engine.apply(FilterMode::Grayscale, gradient(10, 10, 3)).unwrap();
        let twice = engine.apply(FilterMode::Grayscale, once.clone()).unwrap();
        assert_eq!(once, twice);
        assert!(once.data.chunks_exact(3).all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_edges_on_flat_image_are_empty() {
        let flat = ColorImage::filled(32, 24, &[200, 10, 10]).unwrap();
        let edges = FilterEngine::default()
            .apply(FilterMode::EdgeDetect, flat)
            .unwrap();
        assert!(edges.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let engine = FilterEngine::default();
        for mode in FilterMode::ALL {
            let broken = ColorImage {
                width: 0,
                height: 4,
                channels: 3,
                data: Vec::new(),
            };
            assert!(matches!(
                engine.apply(mode, broken),
                Err(PipelineError::InvalidImage(_))
            ));
        }
    }
}
