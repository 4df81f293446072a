//! Repacking of 4:2:0 planes into one contiguous buffer

use tracing::trace;

use crate::frame_pipeline::common::error::{PipelineError, Result};
use crate::frame_pipeline::raw::types::{Plane, RawFrame};

/// Order of the chroma bytes that follow the luma plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaLayout {
    /// Full U plane followed by the full V plane (tightly packed source)
    Planar,
    /// V and U alternating per chroma sample (interleaved source)
    InterleavedVu,
}

/// Luma plane followed by half-resolution chroma, no padding anywhere
#[derive(Debug, Clone)]
pub struct PackedYuv {
    pub width: usize,
    pub height: usize,
    pub layout: ChromaLayout,
    pub data: Vec<u8>,
}

impl PackedYuv {
    pub fn chroma_width(&self) -> usize {
        self.width.div_ceil(2)
    }

    pub fn chroma_height(&self) -> usize {
        self.height.div_ceil(2)
    }

    /// (u, v) for the chroma sample covering pixel (x, y).
    #[inline]
    pub fn chroma_at(&self, x: usize, y: usize) -> (u8, u8) {
        let luma_len = self.width * self.height;
        let cw = self.chroma_width();
        let index = (y / 2) * cw + x / 2;
        match self.layout {
            ChromaLayout::Planar => {
                let plane_len = cw * self.chroma_height();
                (
                    self.data[luma_len + index],
                    self.data[luma_len + plane_len + index],
                )
            }
            ChromaLayout::InterleavedVu => {
                let at = luma_len + index * 2;
                (self.data[at + 1], self.data[at])
            }
        }
    }
}

fn check_plane(name: &str, plane: &Plane, width: usize, height: usize) -> Result<()> {
    if plane.pixel_stride == 0 {
        return Err(PipelineError::Format(format!("{name} plane has zero pixel stride")));
    }
    let row_span = (width - 1)
        .checked_mul(plane.pixel_stride)
        .and_then(|span| span.checked_add(1))
        .ok_or_else(|| {
            PipelineError::Format(format!(
                "{name} plane pixel stride {} overflows a row of {} samples",
                plane.pixel_stride, width
            ))
        })?;
    if height > 1 && plane.row_stride < row_span {
        return Err(PipelineError::Format(format!(
            "{name} plane row stride {} shorter than a row of {} samples at pixel stride {}",
            plane.row_stride, width, plane.pixel_stride
        )));
    }
    let required = plane.required_len(width, height).ok_or_else(|| {
        PipelineError::Format(format!(
            "{name} plane strides {}/{} overflow for {}x{} samples",
            plane.row_stride, plane.pixel_stride, width, height
        ))
    })?;
    if plane.len() < required {
        return Err(PipelineError::Format(format!(
            "{name} plane holds {} bytes, {}x{} samples need {}",
            plane.len(),
            width,
            height,
            required
        )));
    }
    Ok(())
}

fn copy_plane(out: &mut Vec<u8>, plane: &Plane, width: usize, height: usize) {
    for y in 0..height {
        let start = y * plane.row_stride;
        if plane.pixel_stride == 1 {
            out.extend_from_slice(&plane.data[start..start + width]);
        } else {
            out.extend((0..width).map(|x| plane.sample(x, y)));
        }
    }
}

/// Builds the contiguous luma + chroma buffer for a three-plane 4:2:0 frame.
///
/// Tightly packed chroma (pixel stride 1) is copied plane after plane.
/// Interleaved chroma (pixel stride > 1) is sampled every `pixel_stride`
/// bytes and re-paired as V, U. Every plane is bounds-checked against its
/// strides before any byte is read.
pub fn pack_yuv420(frame: &RawFrame) -> Result<PackedYuv> {
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return Err(PipelineError::Format(format!(
            "empty frame {}x{}",
            width, height
        )));
    }
    let [luma, u_plane, v_plane] = frame.planes() else {
        return Err(PipelineError::Format(format!(
            "expected 3 planes for 4:2:0 data, found {}",
            frame.planes().len()
        )));
    };
    let (cw, ch) = (width.div_ceil(2), height.div_ceil(2));

    check_plane("Y", luma, width, height)?;
    check_plane("U", u_plane, cw, ch)?;
    check_plane("V", v_plane, cw, ch)?;
    if u_plane.pixel_stride != v_plane.pixel_stride {
        return Err(PipelineError::Format(format!(
            "chroma pixel strides differ: U={} V={}",
            u_plane.pixel_stride, v_plane.pixel_stride
        )));
    }

    let mut data = Vec::with_capacity(width * height + 2 * cw * ch);
    copy_plane(&mut data, luma, width, height);

    let layout = if u_plane.pixel_stride == 1 {
        copy_plane(&mut data, u_plane, cw, ch);
        copy_plane(&mut data, v_plane, cw, ch);
        ChromaLayout::Planar
    } else {
        for y in 0..ch {
            for x in 0..cw {
                data.push(v_plane.sample(x, y));
                data.push(u_plane.sample(x, y));
            }
        }
        ChromaLayout::InterleavedVu
    };

    trace!(
        width,
        height,
        ?layout,
        chroma_pixel_stride = u_plane.pixel_stride,
        "Packed 4:2:0 frame"
    );

    Ok(PackedYuv {
        width,
        height,
        layout,
        data,
    })
}
