//! Raw frame types

use std::fmt;

/// One memory plane of a raw frame
#[derive(Debug, Clone)]
pub struct Plane {
    /// Plane bytes, possibly with row padding and interleaved companion samples
    pub data: Vec<u8>,
    /// Byte distance between the starts of consecutive rows
    pub row_stride: usize,
    /// Byte distance between consecutive samples within a row
    pub pixel_stride: usize,
}

impl Plane {
    pub fn new(data: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// Tightly packed plane: one byte per sample, no row padding.
    pub fn packed(data: Vec<u8>, width: usize) -> Self {
        Self::new(data, width, 1)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Smallest byte count that can hold `width` x `height` samples with this
    /// plane's strides. The last row does not need trailing padding.
    /// `None` when the strides overflow the address space.
    pub fn required_len(&self, width: usize, height: usize) -> Option<usize> {
        if width == 0 || height == 0 {
            return Some(0);
        }
        (height - 1)
            .checked_mul(self.row_stride)?
            .checked_add((width - 1).checked_mul(self.pixel_stride)?)?
            .checked_add(1)
    }

    #[inline]
    pub(crate) fn sample(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.row_stride + x * self.pixel_stride]
    }
}

type ReleaseFn = Box<dyn FnOnce() + Send + 'static>;

/// One sensor exposure.
///
/// The backing buffer belongs to the camera subsystem. Whatever release
/// capability was attached with [`RawFrame::with_release`] runs exactly once,
/// either through [`RawFrame::release`] or when the frame is dropped.
pub struct RawFrame {
    width: usize,
    height: usize,
    planes: Vec<Plane>,
    sequence: u64,
    release: Option<ReleaseFn>,
}

impl RawFrame {
    pub fn new(width: usize, height: usize, planes: Vec<Plane>) -> Self {
        Self {
            width,
            height,
            planes,
            sequence: 0,
            release: None,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Attach the callback that returns the buffer to its owner.
    pub fn with_release<F>(mut self, release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.release = Some(Box::new(release));
        self
    }

    /// Run `hook` after whatever release capability is already attached.
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let previous = self.release.take();
        self.release = Some(Box::new(move || {
            if let Some(previous) = previous {
                previous();
            }
            hook();
        }));
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Give the buffer back now instead of waiting for drop.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for RawFrame {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("planes", &self.planes.len())
            .field("sequence", &self.sequence)
            .field("pending_release", &self.release.is_some())
            .finish()
    }
}
