use crate::frame_pipeline::common::{ColorImage, Result, rows::fill_rows};

/// BT.601 luma weights in 14-bit fixed point; the three sum to 1 << 14.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;

/// Perceptual luminance of one RGB pixel. Equal inputs map to themselves.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT + (1 << (SHIFT - 1)))
        >> SHIFT) as u8
}

/// Single-channel luminance plane of `image`.
pub(crate) fn luminance_plane(image: &ColorImage, parallel: bool) -> Vec<u8> {
    if image.channels == 1 {
        return image.data.clone();
    }
    let (width, channels) = (image.width, image.channels);
    let mut plane = vec![0u8; image.width * image.height];
    fill_rows(&mut plane, width, parallel, |y, row| {
        let src = &image.data[y * width * channels..(y + 1) * width * channels];
        for (dst, pixel) in row.iter_mut().zip(src.chunks_exact(channels)) {
            *dst = luminance(pixel[0], pixel[1], pixel[2]);
        }
    });
    plane
}

/// Writes `plane` back out at `like`'s channel count, keeping its alpha.
pub(crate) fn expand_plane(plane: &[u8], like: &ColorImage, parallel: bool) -> Result<ColorImage> {
    let (width, channels) = (like.width, like.channels);
    let mut out = vec![0u8; like.data.len()];
    fill_rows(&mut out, width * channels, parallel, |y, row| {
        let values = &plane[y * width..(y + 1) * width];
        let src = &like.data[y * width * channels..(y + 1) * width * channels];
        for ((pixel, &value), original) in row
            .chunks_exact_mut(channels)
            .zip(values)
            .zip(src.chunks_exact(channels))
        {
            let color = channels.min(3);
            pixel[..color].fill(value);
            if channels == 4 {
                pixel[3] = original[3];
            }
        }
    });
    ColorImage::new(like.width, like.height, channels, out)
}

pub(crate) fn grayscale(image: &ColorImage, parallel: bool) -> Result<ColorImage> {
    let plane = luminance_plane(image, parallel);
    expand_plane(&plane, image, parallel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_input_unchanged() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(luminance(v, v, v), v);
        }
    }

    #[test]
    fn test_primary_weights() {
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 29);
    }

    #[test]
    fn test_alpha_preserved() {
        let image = ColorImage::new(1, 2, 4, vec![255, 0, 0, 10, 0, 0, 255, 200]).unwrap();
        let gray = grayscale(&image, false).unwrap();
        assert_eq!(gray.data, vec![76, 76, 76, 10, 29, 29, 29, 200]);
    }
}
