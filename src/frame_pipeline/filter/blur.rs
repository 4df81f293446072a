use crate::frame_pipeline::common::{ColorImage, Result, rows::{fill_rows, reflect_101}};

/// Kernel side length, matching the classic 15x15 preview blur.
pub(crate) const KERNEL_SIZE: usize = 15;

/// Sigma derived from the kernel size when none is given explicitly.
fn default_sigma(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = default_sigma(size);
    let radius = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - radius;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Separable Gaussian blur with reflect-101 borders.
pub(crate) fn gaussian_blur(image: &ColorImage, parallel: bool) -> Result<ColorImage> {
    let kernel = gaussian_kernel(KERNEL_SIZE);
    let radius = (KERNEL_SIZE / 2) as isize;
    let (width, height, channels) = (image.width, image.height, image.channels);
    let row_len = width * channels;

    let mut horizontal = vec![0f32; image.data.len()];
    fill_rows(&mut horizontal, row_len, parallel, |y, row| {
        let src = &image.data[y * row_len..(y + 1) * row_len];
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0f32;
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + k as isize - radius, width);
                    acc += weight * src[sx * channels + c] as f32;
                }
                row[x * channels + c] = acc;
            }
        }
    });

    let mut out = vec![0u8; image.data.len()];
    fill_rows(&mut out, row_len, parallel, |y, row| {
        for (i, value) in row.iter_mut().enumerate() {
            let mut acc = 0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, height);
                acc += weight * horizontal[sy * row_len + i];
            }
            *value = acc.round().clamp(0.0, 255.0) as u8;
        }
    });

    ColorImage::new(width, height, channels, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(KERNEL_SIZE);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((kernel[0] - kernel[KERNEL_SIZE - 1]).abs() < 1e-7);
        assert!(kernel[KERNEL_SIZE / 2] > kernel[0]);
    }

    #[test]
    fn test_flat_image_unchanged() {
        let image = ColorImage::filled(20, 10, &[40, 120, 200]).unwrap();
        let blurred = gaussian_blur(&image, true).unwrap();
        assert_eq!(blurred, image);
    }

    #[test]
    fn test_step_is_softened() {
        let mut data = vec![0u8; 32 * 4];
        for y in 0..4 {
            for x in 16..32 {
                data[y * 32 + x] = 255;
            }
        }
        let image = ColorImage::new(32, 4, 1, data).unwrap();
        let blurred = gaussian_blur(&image, false).unwrap();
        let left = blurred.data[15];
        let right = blurred.data[16];
        assert!(left > 0 && left < 255, "left={left}");
        assert!(right > 0 && right < 255, "right={right}");
        assert_eq!(blurred.data[0], 0);
        assert_eq!(blurred.data[31], 255);
    }

    #[test]
    fn test_tiny_image() {
        let image = ColorImage::new(1, 1, 3, vec![9, 8, 7]).unwrap();
        assert_eq!(gaussian_blur(&image, false).unwrap(), image);
    }
}
