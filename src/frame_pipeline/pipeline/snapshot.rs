use crate::frame_pipeline::filter::FilterMode;
use crate::frame_pipeline::orientation::OrientationState;

/// Settings one frame is processed with, published as a unit so the
/// processing thread never sees half of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSnapshot {
    pub filter: FilterMode,
    pub orientation: OrientationState,
}
