//! Pure frame transforms: aspect-fit compositing, blending, scaling,
//! cropping, rotation and mirroring.
//!
//! All functions take RGBA8 frames and return fresh owned frames (or write
//! into a caller-owned destination). Coordinates that fall outside a frame
//! are skipped or left zero; nothing here fails.

use rayon::prelude::*;
use reelcut_core::Frame;
use serde::{Deserialize, Serialize};

/// Per-layer placement parameters for [`composite`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipGeometry {
    /// Layer opacity in `[0, 1]`
    pub opacity: f32,
}

impl ClipGeometry {
    /// Opacity is clamped to `[0, 1]`; NaN and infinities mean fully opaque.
    pub fn new(opacity: f32) -> Self {
        Self {
            opacity: unit_weight(opacity, 1.0),
        }
    }
}

impl Default for ClipGeometry {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

/// Clamp into `[0, 1]`, mapping non-finite input to `fallback`.
fn unit_weight(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Aspect-fit `src` into the centre of `dest` with nearest-neighbour
/// sampling and alpha-over blending.
///
/// Fully transparent source pixels leave the destination untouched; any
/// other blended pixel gets an opaque destination alpha.
pub fn composite(dest: &mut Frame, src: &Frame, geometry: &ClipGeometry) {
    if src.is_empty() || dest.is_empty() {
        return;
    }

    let (dw, dh) = (dest.width, dest.height);
    let (sw, sh) = (src.width, src.height);
    let scale = (dw as f32 / sw as f32).min(dh as f32 / sh as f32);
    let scaled_w = ((sw as f32 * scale) as u32).min(dw);
    let scaled_h = ((sh as f32 * scale) as u32).min(dh);
    let off_x = (dw - scaled_w) / 2;
    let off_y = (dh - scaled_h) / 2;
    let opacity = unit_weight(geometry.opacity, 1.0);

    for y in 0..scaled_h {
        let sy = ((y as f32 / scale) as u32).min(sh - 1);
        for x in 0..scaled_w {
            let sx = ((x as f32 / scale) as u32).min(sw - 1);
            let si = (sy as usize * sw as usize + sx as usize) * 4;
            let a = src.data[si + 3] as f32 / 255.0 * opacity;
            if a <= 0.0 {
                continue;
            }

            let di = ((y + off_y) as usize * dw as usize + (x + off_x) as usize) * 4;
            for c in 0..3 {
                let s = src.data[si + c] as f32;
                let d = dest.data[di + c] as f32;
                dest.data[di + c] = (s * a + d * (1.0 - a)) as u8;
            }
            dest.data[di + 3] = 255;
        }
    }
}

/// Uniform RGB crossfade of `src` over `dest` across their common pixel
/// count. Destination alpha is not touched; a non-finite `alpha` leaves
/// `dest` as it was.
pub fn blend(dest: &mut Frame, src: &Frame, alpha: f32) {
    let a = unit_weight(alpha, 0.0);
    for (d, s) in dest
        .data
        .chunks_exact_mut(4)
        .zip(src.data.chunks_exact(4))
    {
        for c in 0..3 {
            d[c] = (d[c] as f32 * (1.0 - a) + s[c] as f32 * a) as u8;
        }
    }
}

/// Bilinear resample to `width`×`height`, all four channels.
pub fn scale(src: &Frame, width: u32, height: u32) -> Frame {
    let mut out = Frame::new(width, height).with_timestamp(src.timestamp_us);
    if src.is_empty() || out.is_empty() {
        return out;
    }

    let (sw, sh) = (src.width, src.height);
    let x_ratio = sw as f32 / width as f32;
    let y_ratio = sh as f32 / height as f32;
    let row_bytes = width as usize * 4;

    out.data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = y as f32 * y_ratio;
            let y0 = (fy as u32).min(sh - 1);
            let y1 = (y0 + 1).min(sh - 1);
            let dy = fy - y0 as f32;

            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let fx = x as f32 * x_ratio;
                let x0 = (fx as u32).min(sw - 1);
                let x1 = (x0 + 1).min(sw - 1);
                let dx = fx - x0 as f32;

                let at = |xx: u32, yy: u32| (yy as usize * sw as usize + xx as usize) * 4;
                let (p00, p10, p01, p11) = (at(x0, y0), at(x1, y0), at(x0, y1), at(x1, y1));
                for c in 0..4 {
                    let top = src.data[p00 + c] as f32 * (1.0 - dx) + src.data[p10 + c] as f32 * dx;
                    let bottom =
                        src.data[p01 + c] as f32 * (1.0 - dx) + src.data[p11 + c] as f32 * dx;
                    px[c] = (top * (1.0 - dy) + bottom * dy) as u8;
                }
            }
        });
    out
}

/// Copy the `width`×`height` region whose top-left corner is `(x, y)`.
/// Parts of the region outside `src` stay zero.
pub fn crop(src: &Frame, x: i32, y: i32, width: u32, height: u32) -> Frame {
    let mut out = Frame::new(width, height).with_timestamp(src.timestamp_us);
    for oy in 0..height {
        let sy = y as i64 + oy as i64;
        if sy < 0 || sy >= src.height as i64 {
            continue;
        }
        for ox in 0..width {
            let sx = x as i64 + ox as i64;
            if sx < 0 || sx >= src.width as i64 {
                continue;
            }
            if let Some(px) = src.pixel(sx as u32, sy as u32) {
                out.set_pixel(ox, oy, px);
            }
        }
    }
    out
}

/// Rotate clockwise by a multiple of 90 degrees. Any other angle returns an
/// unchanged copy.
pub fn rotate(src: &Frame, degrees: i32) -> Frame {
    let (w, h) = (src.width, src.height);
    let normalized = degrees.rem_euclid(360);
    let (out_w, out_h) = match normalized {
        90 | 270 => (h, w),
        180 => (w, h),
        _ => return src.clone(),
    };

    let mut out = Frame::new(out_w, out_h).with_timestamp(src.timestamp_us);
    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match normalized {
                90 => (h - 1 - y, x),
                180 => (w - 1 - x, h - 1 - y),
                _ => (y, w - 1 - x),
            };
            if let Some(px) = src.pixel(x, y) {
                out.set_pixel(dx, dy, px);
            }
        }
    }
    out
}

/// Mirror left to right.
pub fn flip_horizontal(src: &Frame) -> Frame {
    let mut out = src.clone();
    let row_bytes = src.width as usize * 4;
    if row_bytes == 0 {
        return out;
    }
    for row in out.data.chunks_exact_mut(row_bytes) {
        let pixels = row.len() / 4;
        for x in 0..pixels / 2 {
            let (l, r) = (x * 4, (pixels - 1 - x) * 4);
            for c in 0..4 {
                row.swap(l + c, r + c);
            }
        }
    }
    out
}

/// Mirror top to bottom.
pub fn flip_vertical(src: &Frame) -> Frame {
    let mut out = src.clone();
    let row_bytes = src.width as usize * 4;
    if row_bytes == 0 {
        return out;
    }
    for (dst_row, src_row) in out
        .data
        .chunks_exact_mut(row_bytes)
        .zip(src.data.chunks_exact(row_bytes).rev())
    {
        dst_row.copy_from_slice(src_row);
    }
    out
}
