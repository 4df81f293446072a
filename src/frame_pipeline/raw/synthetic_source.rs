//! Test-pattern camera producing YUV_420_888-style frames.
//!
//! Chroma is delivered the way most mobile sensors hand it out: one
//! interleaved VU buffer exposed as two planes with pixel stride 2, rows
//! padded to an alignment boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::frame_pipeline::common::error::{PipelineError, Result};
use crate::frame_pipeline::orientation::{CameraFacing, Rotation};
use crate::frame_pipeline::raw::source::FrameSource;
use crate::frame_pipeline::raw::types::{Plane, RawFrame};

const ROW_ALIGNMENT: usize = 64;

pub struct SyntheticCamera {
    width: usize,
    height: usize,
    facing: CameraFacing,
    sensor_orientation: Rotation,
    sequence: u64,
    frame_limit: Option<u64>,
    released: Arc<AtomicU64>,
}

impl SyntheticCamera {
    pub fn new(width: usize, height: usize, facing: CameraFacing) -> Self {
        // Typical mounting: back sensors at 90, front sensors at 270
        let sensor_orientation = match facing {
            CameraFacing::Back => Rotation::Deg90,
            CameraFacing::Front => Rotation::Deg270,
        };
        Self {
            width,
            height,
            facing,
            sensor_orientation,
            sequence: 0,
            frame_limit: None,
            released: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stop producing frames after `limit` exposures, as if unplugged.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Number of buffers handed back so far.
    pub fn released_count(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }

    pub fn produced_count(&self) -> u64 {
        self.sequence
    }

    fn aligned(len: usize) -> usize {
        len.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT
    }

    fn build_frame(&self, sequence: u64) -> RawFrame {
        let (w, h) = (self.width, self.height);
        let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
        let shift = (sequence % 256) as usize;

        let y_stride = Self::aligned(w);
        let mut luma = vec![0u8; y_stride * h];
        for y in 0..h {
            for x in 0..w {
                luma[y * y_stride + x] = ((x + y + shift) % 256) as u8;
            }
        }

        // one shared VU buffer; the U plane starts one byte in
        let uv_stride = Self::aligned(cw * 2);
        let mut vu = vec![128u8; uv_stride * ch];
        for y in 0..ch {
            for x in 0..cw {
                let i = y * uv_stride + x * 2;
                vu[i] = ((x * 255) / cw.max(1)) as u8;
                vu[i + 1] = ((y * 255) / ch.max(1)) as u8;
            }
        }
        let chroma_len = (ch - 1) * uv_stride + (cw - 1) * 2 + 1;
        let v_plane = vu[..chroma_len].to_vec();
        let u_plane = vu[1..1 + chroma_len].to_vec();

        let released = Arc::clone(&self.released);
        RawFrame::new(
            w,
            h,
            vec![
                Plane::new(luma, y_stride, 1),
                Plane::new(u_plane, uv_stride, 2),
                Plane::new(v_plane, uv_stride, 2),
            ],
        )
        .with_sequence(sequence)
        .with_release(move || {
            released.fetch_add(1, Ordering::SeqCst);
        })
    }
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Result<RawFrame> {
        if let Some(limit) = self.frame_limit {
            if self.sequence >= limit {
                return Err(PipelineError::DeviceUnavailable(format!(
                    "synthetic {:?} camera stopped after {} frames",
                    self.facing, limit
                )));
            }
        }
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::DeviceUnavailable(
                "synthetic camera configured with an empty resolution".to_string(),
            ));
        }
        let frame = self.build_frame(self.sequence);
        debug!(sequence = self.sequence, "Synthetic frame captured");
        self.sequence += 1;
        Ok(frame)
    }

    fn sensor_orientation(&self) -> Rotation {
        self.sensor_orientation
    }

    fn facing(&self) -> CameraFacing {
        self.facing
    }
}
