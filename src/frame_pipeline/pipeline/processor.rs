use tracing::{debug_span, instrument, warn};

use crate::frame_pipeline::common::{ColorImage, PipelineError, Result};
use crate::frame_pipeline::convert::PixelFormatConverter;
use crate::frame_pipeline::filter::FilterEngine;
use crate::frame_pipeline::orientation::OrientationCorrector;
use crate::frame_pipeline::pipeline::{PipelineConfig, PipelineSnapshot, PipelineTimings, Stage};
use crate::frame_pipeline::raw::RawFrame;

/// Work the scheduler runs on its processing thread for every accepted frame.
///
/// Implementations own the frame and must let go of it (drop or
/// [`RawFrame::release`]) before returning, whatever the outcome.
pub trait FrameProcessor: Send + Sync + 'static {
    fn process(&self, frame: RawFrame, snapshot: &PipelineSnapshot) -> Result<ColorImage>;
}

/// Convert → filter → rotate
pub struct FramePipeline {
    converter: PixelFormatConverter,
    filters: FilterEngine,
    corrector: OrientationCorrector,
    config: PipelineConfig,
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            converter: PixelFormatConverter::new(config.output_channels, config.parallel),
            filters: FilterEngine::new(config.parallel),
            corrector: OrientationCorrector::new(config.parallel),
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(width, height, max, "Frame dimensions exceed maximum");
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Runs every stage on `frame`, recording how long each took.
    ///
    /// The raw frame is released right after conversion; filtering and
    /// rotation only see the decoded image.
    #[instrument(skip_all, fields(sequence = frame.sequence(), filter = snapshot.filter.name()))]
    pub fn process_with_timings(
        &self,
        frame: RawFrame,
        snapshot: &PipelineSnapshot,
    ) -> Result<(ColorImage, PipelineTimings)> {
        let mut timings = PipelineTimings::new();

        timings.measure(Stage::Validate, || {
            self.validate_dimensions(frame.width(), frame.height())
        })?;

        let image = timings.measure(Stage::Convert, || {
            let _span = debug_span!("convert", width = frame.width(), height = frame.height())
                .entered();
            self.converter.convert(&frame)
        });
        timings.measure(Stage::Release, || frame.release());
        let image = image?;

        let image = timings.measure(Stage::Filter, || {
            let _span = debug_span!("filter").entered();
            self.filters.apply(snapshot.filter, image)
        })?;

        let rotation = snapshot.orientation.total_rotation();
        let image = timings.measure(Stage::Rotate, || {
            let _span = debug_span!("rotate", degrees = rotation.degrees()).entered();
            self.corrector.rotate(image, rotation)
        })?;

        Ok((image, timings))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn converter(&self) -> &PixelFormatConverter {
        &self.converter
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn corrector(&self) -> &OrientationCorrector {
        &self.corrector
    }
}

impl FrameProcessor for FramePipeline {
    fn process(&self, frame: RawFrame, snapshot: &PipelineSnapshot) -> Result<ColorImage> {
        let sequence = frame.sequence();
        let (image, timings) = self.process_with_timings(frame, snapshot)?;
        timings.log_summary(sequence);
        Ok(image)
    }
}
