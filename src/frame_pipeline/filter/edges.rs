use crate::frame_pipeline::common::{ColorImage, Result, rows::{fill_rows, replicate}};
use crate::frame_pipeline::filter::grayscale::{expand_plane, luminance_plane};

pub(crate) const LOW_THRESHOLD: i32 = 50;
pub(crate) const HIGH_THRESHOLD: i32 = 150;

// tan(22.5 deg) in 15-bit fixed point
const TAN_22_5: i32 = 13573;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// 3x3 Sobel on the luminance plane; returns (gx, gy) per pixel.
fn sobel(plane: &[u8], width: usize, height: usize, parallel: bool) -> Vec<(i32, i32)> {
    let at = |x: isize, y: isize| -> i32 {
        plane[replicate(y, height) * width + replicate(x, width)] as i32
    };
    let mut gradients = vec![(0i32, 0i32); width * height];
    fill_rows(&mut gradients, width, parallel, |y, row| {
        let y = y as isize;
        for (x, g) in row.iter_mut().enumerate() {
            let x = x as isize;
            let gx = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
            let gy = (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1));
            *g = (gx, gy);
        }
    });
    gradients
}

/// Thinned edge candidates: local maxima along the gradient direction,
/// classified against the two thresholds.
fn suppress_non_maxima(
    gradients: &[(i32, i32)],
    width: usize,
    height: usize,
    parallel: bool,
) -> Vec<u8> {
    let magnitude: Vec<i32> = gradients.iter().map(|(gx, gy)| gx.abs() + gy.abs()).collect();
    let mag = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0
        } else {
            magnitude[y as usize * width + x as usize]
        }
    };

    let mut marks = vec![NOT_EDGE; width * height];
    fill_rows(&mut marks, width, parallel, |y, row| {
        let yi = y as isize;
        for (x, mark) in row.iter_mut().enumerate() {
            let xi = x as isize;
            let (gx, gy) = gradients[y * width + x];
            let m = magnitude[y * width + x];
            if m <= LOW_THRESHOLD {
                continue;
            }
            let (ax, ay) = (gx.abs(), gy.abs());
            let tan22 = ax * TAN_22_5;
            let tan67 = tan22 + ((ax + ax) << 15);
            let ay = ay << 15;

            let is_max = if ay < tan22 {
                m > mag(xi - 1, yi) && m >= mag(xi + 1, yi)
            } else if ay > tan67 {
                m > mag(xi, yi - 1) && m >= mag(xi, yi + 1)
            } else {
                let s = if (gx ^ gy) < 0 { -1 } else { 1 };
                m > mag(xi - s, yi - 1) && m > mag(xi + s, yi + 1)
            };
            if is_max {
                *mark = if m > HIGH_THRESHOLD { STRONG } else { WEAK };
            }
        }
    });
    marks
}

/// Keeps weak candidates only when 8-connected to a strong edge.
fn hysteresis(marks: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut edges = vec![0u8; width * height];
    let mut stack: Vec<usize> = marks
        .iter()
        .enumerate()
        .filter(|(_, m)| **m == STRONG)
        .map(|(i, _)| i)
        .collect();
    for &i in &stack {
        edges[i] = u8::MAX;
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % width) as isize, (i / width) as isize);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let n = ny as usize * width + nx as usize;
                if marks[n] == WEAK && edges[n] == 0 {
                    edges[n] = u8::MAX;
                    stack.push(n);
                }
            }
        }
    }
    edges
}

/// Binary Canny edge map (0 or 255) at the input's channel count.
pub(crate) fn detect_edges(image: &ColorImage, parallel: bool) -> Result<ColorImage> {
    let (width, height) = (image.width, image.height);
    let plane = luminance_plane(image, parallel);
    let gradients = sobel(&plane, width, height, parallel);
    let marks = suppress_non_maxima(&gradients, width, height, parallel);
    let edges = hysteresis(&marks, width, height);
    expand_plane(&edges, image, parallel)
}
