//! Filter selection

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Pass the frame through untouched
    #[default]
    Identity,
    Grayscale,
    /// Fixed 15x15 Gaussian smoothing
    Blur,
    /// Canny edge map
    EdgeDetect,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::Identity,
        FilterMode::Grayscale,
        FilterMode::Blur,
        FilterMode::EdgeDetect,
    ];

    /// Decodes a stored selection; unknown values select `Identity`.
    pub fn from_index(index: u8) -> Self {
        match Self::ALL.get(index as usize) {
            Some(mode) => *mode,
            None => {
                warn!(index, "Unknown filter selection, using identity");
                FilterMode::Identity
            }
        }
    }

    pub fn index(self) -> u8 {
        match self {
            FilterMode::Identity => 0,
            FilterMode::Grayscale => 1,
            FilterMode::Blur => 2,
            FilterMode::EdgeDetect => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterMode::Identity => "normal",
            FilterMode::Grayscale => "gray",
            FilterMode::Blur => "blur",
            FilterMode::EdgeDetect => "edges",
        }
    }
}
