// ITU-R BT.601 limited-range coefficients in 20-bit fixed point
const SHIFT: i32 = 20;
const ROUND: i32 = 1 << (SHIFT - 1);
const CY: i32 = 1_220_542; // 1.164
const CVR: i32 = 1_673_527; // 1.596
const CVG: i32 = -852_492; // -0.813
const CUG: i32 = -409_993; // -0.391
const CUB: i32 = 2_116_026; // 2.018

#[inline]
fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Converts one YUV sample triple to RGB.
#[inline]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let luma = (y as i32 - 16).max(0) * CY;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    [
        clamp_u8((luma + CVR * v + ROUND) >> SHIFT),
        clamp_u8((luma + CVG * v + CUG * u + ROUND) >> SHIFT),
        clamp_u8((luma + CUB * u + ROUND) >> SHIFT),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_gray() {
        let [r, g, b] = yuv_to_rgb(126, 128, 128);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_range_endpoints() {
        assert_eq!(yuv_to_rgb(16, 128, 128), [0, 0, 0]);
        assert_eq!(yuv_to_rgb(235, 128, 128), [255, 255, 255]);
    }

    #[test]
    fn test_strong_v_is_red() {
        let [r, g, b] = yuv_to_rgb(81, 90, 240);
        assert!(r > 200, "r={r}");
        assert!(g < 40, "g={g}");
        assert!(b < 40, "b={b}");
    }
}
