use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Malformed raw frame: {0}")]
    Format(String),

    #[error("Invalid color image: {0}")]
    InvalidImage(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Camera device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Failed to spawn pipeline thread: {0}")]
    WorkerSpawn(String),
}

impl PipelineError {
    /// Whether the failure belongs to a single frame and the stream can go on.
    pub fn is_per_frame(&self) -> bool {
        matches!(
            self,
            PipelineError::Format(_)
                | PipelineError::InvalidImage(_)
                | PipelineError::InvalidDimensions(_, _)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
