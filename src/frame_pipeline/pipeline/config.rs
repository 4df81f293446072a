//! Pipeline configuration types

use tracing::warn;

/// Configuration for frame processing and scheduling
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Whether to reject frames with zero or oversized dimensions up front
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
    /// 3 for RGB output, 4 for RGBA with opaque alpha
    pub output_channels: usize,
    /// Spread per-row work across the rayon pool
    pub parallel: bool,
    /// Name of the processing thread
    pub worker_thread_name: String,
    /// Name of the presentation thread when the scheduler spawns one
    pub presenter_thread_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validate_dimensions: true,
            max_dimension: Some(8192),
            output_channels: 3,
            parallel: true,
            worker_thread_name: "frame-processor".to_string(),
            presenter_thread_name: "frame-presenter".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    output_channels: Option<usize>,
    parallel: Option<bool>,
    worker_thread_name: Option<String>,
    presenter_thread_name: Option<String>,
}

impl PipelineConfigBuilder {
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn output_channels(mut self, channels: usize) -> Self {
        self.output_channels = Some(channels);
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn worker_thread_name(mut self, name: impl Into<String>) -> Self {
        self.worker_thread_name = Some(name.into());
        self
    }

    pub fn presenter_thread_name(mut self, name: impl Into<String>) -> Self {
        self.presenter_thread_name = Some(name.into());
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        let output_channels = match self.output_channels.unwrap_or(default.output_channels) {
            channels @ (3 | 4) => channels,
            other => {
                warn!(channels = other, "Unsupported output channel count, using RGB");
                3
            }
        };
        PipelineConfig {
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            output_channels,
            parallel: self.parallel.unwrap_or(default.parallel),
            worker_thread_name: self.worker_thread_name.unwrap_or(default.worker_thread_name),
            presenter_thread_name: self
                .presenter_thread_name
                .unwrap_or(default.presenter_thread_name),
        }
    }
}
