use tracing::debug;

use crate::frame_pipeline::common::{ColorImage, Result, rows::fill_rows};
use crate::frame_pipeline::convert::bt601::yuv_to_rgb;
use crate::frame_pipeline::convert::packing::{PackedYuv, pack_yuv420};
use crate::frame_pipeline::raw::types::RawFrame;

/// Decodes 4:2:0 sensor frames into interleaved RGB or RGBA images
#[derive(Debug, Clone, Copy)]
pub struct PixelFormatConverter {
    output_channels: usize,
    parallel: bool,
}

impl Default for PixelFormatConverter {
    fn default() -> Self {
        Self {
            output_channels: 3,
            parallel: true,
        }
    }
}

impl PixelFormatConverter {
    /// `output_channels` is 3 for RGB or 4 for RGBA with opaque alpha;
    /// anything else is treated as 3.
    pub fn new(output_channels: usize, parallel: bool) -> Self {
        let output_channels = if output_channels == 4 { 4 } else { 3 };
        Self {
            output_channels,
            parallel,
        }
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// Converts a three-plane frame. Only reads from the frame; the caller
    /// can release it as soon as this returns.
    pub fn convert(&self, frame: &RawFrame) -> Result<ColorImage> {
        let packed = pack_yuv420(frame)?;
        self.convert_packed(&packed)
    }

    pub fn convert_packed(&self, packed: &PackedYuv) -> Result<ColorImage> {
        let (width, height, channels) = (packed.width, packed.height, self.output_channels);
        debug!(width, height, channels, layout = ?packed.layout, "Converting YUV to RGB");

        let mut out = vec![0u8; width * height * channels];
        fill_rows(&mut out, width * channels, self.parallel, |y, row| {
            let luma = &packed.data[y * width..(y + 1) * width];
            for (x, pixel) in row.chunks_exact_mut(channels).enumerate() {
                let (u, v) = packed.chroma_at(x, y);
                pixel[..3].copy_from_slice(&yuv_to_rgb(luma[x], u, v));
                if channels == 4 {
                    pixel[3] = u8::MAX;
                }
            }
        });

        ColorImage::new(width, height, channels, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_pipeline::common::PipelineError;
    use crate::frame_pipeline::raw::types::Plane;

    fn flat_frame(width: usize, height: usize, y: u8, u: u8, v: u8, pixel_stride: usize) -> RawFrame {
        let (cw, ch) = (width.div_ceil(2), height.div_ceil(2));
        let luma = Plane::packed(vec![y; width * height], width);
        if pixel_stride == 1 {
            return RawFrame::new(
                width,
                height,
                vec![
                    luma,
                    Plane::packed(vec![u; cw * ch], cw),
                    Plane::packed(vec![v; cw * ch], cw),
                ],
            );
        }
        let mut shared = Vec::with_capacity(cw * ch * 2);
        for _ in 0..cw * ch {
            shared.push(u);
            shared.push(v);
        }
        let len = shared.len() - 1;
        RawFrame::new(
            width,
            height,
            vec![
                luma,
                Plane::new(shared[..len].to_vec(), cw * 2, 2),
                Plane::new(shared[1..].to_vec(), cw * 2, 2),
            ],
        )
    }

    #[test]
    fn test_near_white_frame() {
        let frame = flat_frame(640, 480, 235, 128, 128, 1);
        let image = PixelFormatConverter::default().convert(&frame).unwrap();
        assert_eq!(image.dimensions(), (640, 480));
        assert_eq!(image.channels, 3);
        assert!(image.data.iter().all(|&v| v >= 254), "expected near-white output");
    }

    #[test]
    fn test_dimensions_preserved_for_odd_sizes() {
        let frame = flat_frame(7, 5, 120, 128, 128, 1);
        let image = PixelFormatConverter::default().convert(&frame).unwrap();
        assert_eq!(image.dimensions(), (7, 5));
        assert!(image.validate().is_ok());
    }

    #[test]
    fn test_strides_agree() {
        let converter = PixelFormatConverter::new(3, false);
        let planar = converter.convert(&flat_frame(8, 6, 81, 90, 240, 1)).unwrap();
        let interleaved = converter.convert(&flat_frame(8, 6, 81, 90, 240, 2)).unwrap();
        assert_eq!(planar, interleaved);
        let [r, g, b] = [planar.data[0], planar.data[1], planar.data[2]];
        assert!(r > 200 && g < 40 && b < 40);
    }

    #[test]
    fn test_rgba_output_is_opaque() {
        let frame = flat_frame(4, 4, 128, 128, 128, 2);
        let image = PixelFormatConverter::new(4, true).convert(&frame).unwrap();
        assert_eq!(image.channels, 4);
        assert!(image.data.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_unsupported_channel_count_falls_back_to_rgb() {
        assert_eq!(PixelFormatConverter::new(2, true).output_channels(), 3);
    }

    #[test]
    fn test_undersized_frame_is_format_error() {
        let frame = RawFrame::new(
            640,
            480,
            vec![
                Plane::packed(vec![0; 640 * 479], 640),
                Plane::packed(vec![128; 320 * 240], 320),
                Plane::packed(vec![128; 320 * 240], 320),
            ],
        );
        let result = PixelFormatConverter::default().convert(&frame);
        assert!(matches!(result, Err(PipelineError::Format(_))));
    }

    #[test]
    fn test_huge_row_stride_is_format_error() {
        let frame = RawFrame::new(
            4,
            4,
            vec![
                Plane::new(vec![0; 16], usize::MAX / 2, 1),
                Plane::packed(vec![128; 4], 2),
                Plane::packed(vec![128; 4], 2),
            ],
        );
        let result = PixelFormatConverter::default().convert(&frame);
        assert!(matches!(result, Err(PipelineError::Format(_))));
    }
}
