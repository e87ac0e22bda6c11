/// Computes `round(value * alpha / 255)` without a division.
///
/// Exact for all 8-bit inputs; halves round up.
#[inline]
pub const fn mul_div_255(value: u8, alpha: u8) -> u8 {
    let t = value as u32 * alpha as u32 + 128;
    (((t >> 8) + t) >> 8) as u8
}

/// Blends a straight-alpha RGBA8 pixel onto an opaque black background.
///
/// Since the background is zero, this is just every colour channel scaled by the pixel's alpha.
#[inline]
pub const fn composite_on_black([r, g, b, a]: [u8; 4]) -> [u8; 3] {
    [mul_div_255(r, a), mul_div_255(g, a), mul_div_255(b, a)]
}

/// Reorders an RGB8 pixel into a `.mi` pixel record.
#[inline]
pub const fn rgb_to_bgr0([r, g, b]: [u8; 3]) -> [u8; 4] {
    [b, g, r, crate::consts::MI_RESERVED]
}

/// Extracts the RGB8 pixel from a `.mi` pixel record. The reserved byte is ignored.
#[inline]
pub const fn bgr0_to_rgb([b, g, r, _]: [u8; 4]) -> [u8; 3] {
    [r, g, b]
}

/// Converts raster dimensions into header fields, or `None` if either does not fit a u32.
#[inline]
pub fn header_fields(width: usize, height: usize) -> Option<(u32, u32)> {
    Some((u32::try_from(width).ok()?, u32::try_from(height).ok()?))
}
