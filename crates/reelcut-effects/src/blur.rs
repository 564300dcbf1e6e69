//! Separable box and Gaussian blurs plus directional motion blur.
//!
//! All four channels are filtered. Samples outside the frame are dropped
//! and the remaining weights renormalised, so edges never darken.

use rayon::prelude::*;
use reelcut_core::Frame;

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One pass of a separable kernel, reading `src` and writing a fresh buffer.
/// `weights[k + radius]` is the weight of offset `k`.
fn separable_pass(
    src: &[u8],
    width: usize,
    height: usize,
    radius: i32,
    axis: Axis,
    weights: &[f32],
) -> Vec<u8> {
    let mut dst = vec![0u8; src.len()];
    dst.par_chunks_exact_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let mut sum = [0f32; 4];
                let mut total = 0f32;
                for k in -radius..=radius {
                    let (sx, sy) = match axis {
                        Axis::Horizontal => (x as i64 + k as i64, y as i64),
                        Axis::Vertical => (x as i64, y as i64 + k as i64),
                    };
                    if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                        continue;
                    }
                    let w = weights[(k + radius) as usize];
                    let i = (sy as usize * width + sx as usize) * 4;
                    for c in 0..4 {
                        sum[c] += src[i + c] as f32 * w;
                    }
                    total += w;
                }
                for c in 0..4 {
                    px[c] = (sum[c] / total).clamp(0.0, 255.0) as u8;
                }
            }
        });
    dst
}

/// Unit-weight pass with truncating integer averages.
fn box_pass(src: &[u8], width: usize, height: usize, radius: i32, axis: Axis) -> Vec<u8> {
    let mut dst = vec![0u8; src.len()];
    dst.par_chunks_exact_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let mut sum = [0u32; 4];
                let mut count = 0u32;
                for k in -radius..=radius {
                    let (sx, sy) = match axis {
                        Axis::Horizontal => (x as i64 + k as i64, y as i64),
                        Axis::Vertical => (x as i64, y as i64 + k as i64),
                    };
                    if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                        continue;
                    }
                    let i = (sy as usize * width + sx as usize) * 4;
                    for c in 0..4 {
                        sum[c] += src[i + c] as u32;
                    }
                    count += 1;
                }
                for c in 0..4 {
                    px[c] = (sum[c] / count.max(1)) as u8;
                }
            }
        });
    dst
}

/// Furthest offset that can still land inside a `width`×`height` frame.
/// Larger radii only add samples that get dropped.
fn reach(radius: i32, width: u32, height: u32) -> i32 {
    let span = width.max(height).saturating_sub(1);
    radius.min(i32::try_from(span).unwrap_or(i32::MAX))
}

/// Box blur with a `(2r+1)`-wide window, horizontal then vertical.
pub fn box_blur(frame: &mut Frame, radius: i32) {
    if radius <= 0 || frame.is_empty() {
        return;
    }
    let radius = reach(radius, frame.width, frame.height);
    let (w, h) = (frame.width as usize, frame.height as usize);
    let temp = box_pass(&frame.data, w, h, radius, Axis::Horizontal);
    frame.data = box_pass(&temp, w, h, radius, Axis::Vertical);
}

/// Normalized Gaussian weights for `-radius..=radius` with σ = radius / 3.
pub fn gaussian_kernel(radius: i32) -> Vec<f32> {
    truncated_kernel(radius, radius)
}

/// Normalized weights for `-reach..=reach` of the Gaussian with
/// σ = radius / 3.
fn truncated_kernel(radius: i32, reach: i32) -> Vec<f32> {
    let sigma = radius as f32 / 3.0;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-reach..=reach)
        .map(|i| (-(i as f32).powi(2) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

pub fn gaussian_blur(frame: &mut Frame, radius: i32) {
    if radius <= 0 || frame.is_empty() {
        return;
    }
    let limit = reach(radius, frame.width, frame.height);
    let kernel = truncated_kernel(radius, limit);
    let (w, h) = (frame.width as usize, frame.height as usize);
    let temp = separable_pass(&frame.data, w, h, limit, Axis::Horizontal, &kernel);
    frame.data = separable_pass(&temp, w, h, limit, Axis::Vertical, &kernel);
}

/// Average `distance` samples along a line at `angle_deg` through each
/// pixel, centred on the pixel. Sample positions round to the nearest
/// pixel.
pub fn motion_blur(frame: &mut Frame, distance: i32, angle_deg: f32) {
    if distance <= 0 || frame.is_empty() {
        return;
    }
    let (w, h) = (frame.width as i64, frame.height as i64);
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    // Past w + h every step along any direction is off-frame
    let span = i32::try_from(frame.width.saturating_add(frame.height)).unwrap_or(i32::MAX);
    let half = (distance / 2).min(span);
    let src = &frame.data;

    let mut out = vec![0u8; src.len()];
    out.par_chunks_exact_mut(w as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let mut sum = [0f32; 4];
                let mut count = 0u32;
                for d in -half..=half {
                    let sx = (x as f32 + d as f32 * cos).round() as i64;
                    let sy = (y as f32 + d as f32 * sin).round() as i64;
                    if sx < 0 || sy < 0 || sx >= w || sy >= h {
                        continue;
                    }
                    let i = (sy * w + sx) as usize * 4;
                    for c in 0..4 {
                        sum[c] += src[i + c] as f32;
                    }
                    count += 1;
                }
                let n = count.max(1) as f32;
                for c in 0..4 {
                    px[c] = (sum[c] / n).clamp(0.0, 255.0) as u8;
                }
            }
        });
    frame.data = out;
}
