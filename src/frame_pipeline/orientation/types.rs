//! Orientation value types

use tracing::warn;

/// Axis-aligned rotation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Normalises `degrees` modulo 360. Values that are not a multiple of 90
    /// fall back to no rotation.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            other => {
                warn!(degrees, normalized = other, "Unsupported rotation, using 0");
                Rotation::Deg0
            }
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    fn quarter_turns(self) -> u32 {
        self.degrees() / 90
    }

    fn from_quarter_turns(turns: u32) -> Self {
        Self::ALL[(turns % 4) as usize]
    }

    pub fn plus(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    pub fn minus(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 4 - other.quarter_turns())
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        Rotation::Deg0.minus(self)
    }

    /// Next step of the manual rotate control: +90, wrapping at 360.
    pub fn next_clockwise(self) -> Self {
        self.plus(Rotation::Deg90)
    }

    /// Quarter and three-quarter turns exchange width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Which way the sensor points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Front => CameraFacing::Back,
            CameraFacing::Back => CameraFacing::Front,
        }
    }
}

/// Everything the corrector needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationState {
    /// Mounting angle of the sensor, fixed per camera device
    pub sensor_orientation: Rotation,
    /// Current rotation of the display
    pub display_rotation: Rotation,
    pub facing: CameraFacing,
    /// User offset, cycled in +90 steps
    pub manual_rotation: Rotation,
}

impl OrientationState {
    pub fn new(sensor_orientation: Rotation, facing: CameraFacing) -> Self {
        Self {
            sensor_orientation,
            facing,
            ..Self::default()
        }
    }

    /// Net rotation to apply to the output image.
    pub fn total_rotation(&self) -> Rotation {
        super::corrected_rotation(
            self.sensor_orientation,
            self.display_rotation,
            self.facing,
            self.manual_rotation,
        )
    }
}
