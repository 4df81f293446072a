use tracing::debug;

use crate::frame_pipeline::common::{ColorImage, Result, rows::fill_rows};
use crate::frame_pipeline::orientation::types::{CameraFacing, Rotation};

/// Rotation that compensates the sensor mounting angle for the current
/// display rotation. Front cameras are mirrored, so their result is inverted.
pub fn sensor_compensation(
    sensor_orientation: Rotation,
    display_rotation: Rotation,
    facing: CameraFacing,
) -> Rotation {
    match facing {
        CameraFacing::Front => sensor_orientation.plus(display_rotation).inverse(),
        CameraFacing::Back => sensor_orientation.minus(display_rotation),
    }
}

/// Total rotation for a frame: sensor compensation plus the manual offset.
pub fn corrected_rotation(
    sensor_orientation: Rotation,
    display_rotation: Rotation,
    facing: CameraFacing,
    manual_rotation: Rotation,
) -> Rotation {
    sensor_compensation(sensor_orientation, display_rotation, facing).plus(manual_rotation)
}

/// Degree form of [`corrected_rotation`] for callers holding plain angles.
pub fn corrected_degrees(
    sensor_orientation_degrees: i32,
    display_rotation_degrees: i32,
    facing: CameraFacing,
    manual_rotation_degrees: i32,
) -> u32 {
    corrected_rotation(
        Rotation::from_degrees(sensor_orientation_degrees),
        Rotation::from_degrees(display_rotation_degrees),
        facing,
        Rotation::from_degrees(manual_rotation_degrees),
    )
    .degrees()
}

/// Applies axis-aligned rotations to decoded images
#[derive(Debug, Clone, Copy)]
pub struct OrientationCorrector {
    parallel: bool,
}

impl Default for OrientationCorrector {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl OrientationCorrector {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Rotates `image` clockwise by `rotation`.
    ///
    /// `Rotation::Deg0` hands the input back untouched. Every other angle
    /// produces a new buffer with no cropping; quarter turns swap width and
    /// height.
    pub fn rotate(&self, image: ColorImage, rotation: Rotation) -> Result<ColorImage> {
        image.validate()?;
        if rotation == Rotation::Deg0 {
            return Ok(image);
        }

        let (src_w, src_h, channels) = (image.width, image.height, image.channels);
        let (dst_w, dst_h) = if rotation.swaps_dimensions() {
            (src_h, src_w)
        } else {
            (src_w, src_h)
        };
        debug!(
            degrees = rotation.degrees(),
            src_w, src_h, dst_w, dst_h, "Rotating image"
        );

        let src = &image.data;
        let mut out = vec![0u8; dst_w * dst_h * channels];
        fill_rows(&mut out, dst_w * channels, self.parallel, |dy, row| {
            for dx in 0..dst_w {
                let (sx, sy) = match rotation {
                    Rotation::Deg90 => (dy, src_h - 1 - dx),
                    Rotation::Deg180 => (src_w - 1 - dx, src_h - 1 - dy),
                    Rotation::Deg270 => (src_w - 1 - dy, dx),
                    Rotation::Deg0 => (dx, dy),
                };
                let s = (sy * src_w + sx) * channels;
                row[dx * channels..(dx + 1) * channels].copy_from_slice(&src[s..s + channels]);
            }
        });

        ColorImage::new(dst_w, dst_h, channels, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_pipeline::common::PipelineError;

    fn numbered(width: usize, height: usize) -> ColorImage {
        let data = (0..width * height * 3).map(|v| (v % 251) as u8).collect();
        ColorImage::new(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_back_camera_compensation() {
        assert_eq!(corrected_degrees(90, 0, CameraFacing::Back, 0), 90);
        assert_eq!(corrected_degrees(90, 90, CameraFacing::Back, 0), 0);
        assert_eq!(corrected_degrees(90, 180, CameraFacing::Back, 0), 270);
    }

    #[test]
    fn test_front_camera_compensation() {
        assert_eq!(corrected_degrees(270, 0, CameraFacing::Front, 0), 90);
        assert_eq!(corrected_degrees(270, 90, CameraFacing::Front, 0), 0);
        assert_eq!(corrected_degrees(90, 0, CameraFacing::Front, 0), 270);
    }

    #[test]
    fn test_manual_offset_added() {
        assert_eq!(corrected_degrees(90, 0, CameraFacing::Back, 90), 180);
        assert_eq!(corrected_degrees(90, 0, CameraFacing::Back, 270), 0);
    }

    #[test]
    fn test_rotate_zero_is_passthrough() {
        let image = numbered(4, 3);
        let ptr = image.as_ptr();
        let rotated = OrientationCorrector::default()
            .rotate(image, Rotation::Deg0)
            .unwrap();
        assert_eq!(rotated.as_ptr(), ptr);
    }

    #[test]
    fn test_quarter_turn_moves_corners() {
        // 2x1: [A, B] rotated clockwise becomes a 1x2 column [A; B]
        let image = ColorImage::new(2, 1, 1, vec![10, 20]).unwrap();
        let rotated = OrientationCorrector::new(false)
            .rotate(image, Rotation::Deg90)
            .unwrap();
        assert_eq!(rotated.dimensions(), (1, 2));
        assert_eq!(rotated.data, vec![10, 20]);

        // 1x2 column [A; B] rotated clockwise becomes the row [B, A]
        let column = ColorImage::new(1, 2, 1, vec![10, 20]).unwrap();
        let rotated = OrientationCorrector::new(false)
            .rotate(column, Rotation::Deg90)
            .unwrap();
        assert_eq!(rotated.dimensions(), (2, 1));
        assert_eq!(rotated.data, vec![20, 10]);
    }

    #[test]
    fn test_quarter_turns_round_trip() {
        let corrector = OrientationCorrector::default();
        let original = numbered(5, 3);
        let rotated = corrector.rotate(original.clone(), Rotation::Deg90).unwrap();
        assert_eq!(rotated.dimensions(), (3, 5));
        let restored = corrector.rotate(rotated, Rotation::Deg270).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_half_turn_twice_restores() {
        let corrector = OrientationCorrector::default();
        let original = numbered(4, 7);
        let once = corrector.rotate(original.clone(), Rotation::Deg180).unwrap();
        assert_eq!(once.dimensions(), (4, 7));
        assert_ne!(once, original);
        let twice = corrector.rotate(once, Rotation::Deg180).unwrap();
        assert_eq!(twice, original);
    }

    #[test]
    fn test_rotate_rejects_malformed_image() {
        let broken = ColorImage {
            width: 3,
            height: 3,
            channels: 3,
            data: vec![0; 5],
        };
        let result = OrientationCorrector::default().rotate(broken, Rotation::Deg90);
        assert!(matches!(result, Err(PipelineError::InvalidImage(_))));
    }
}
