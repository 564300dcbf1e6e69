//! Per-pixel color adjustment kernels on RGBA8 frames.
//!
//! Each kernel touches RGB only and clamps every result to `[0, 255]`.
//! Pixels are independent, so work is split across rayon's pool; output is
//! identical to a sequential pass.

use glam::{Mat3, Vec2, Vec3};
use rayon::prelude::*;
use reelcut_core::Frame;

/// BT.601 luma weights.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline]
fn for_each_pixel(frame: &mut Frame, f: impl Fn(&mut [u8]) + Sync + Send) {
    frame.data.par_chunks_exact_mut(4).for_each(f);
}

/// Add `trunc(intensity * 255)` to every channel.
pub fn brightness(frame: &mut Frame, intensity: f32) {
    let offset = (intensity * 255.0) as i32;
    for_each_pixel(frame, |px| {
        for c in &mut px[..3] {
            *c = clamp_u8(*c as i32 + offset);
        }
    });
}

/// Stretch channels about mid-grey. `intensity` is clamped to `[-1, 1]`.
pub fn contrast(frame: &mut Frame, intensity: f32) {
    let v = intensity.clamp(-1.0, 1.0) * 255.0;
    let factor = (259.0 * (v + 255.0)) / (255.0 * (259.0 - v));
    for_each_pixel(frame, |px| {
        for c in &mut px[..3] {
            *c = clamp_u8((factor * (*c as f32 - 128.0) + 128.0) as i32);
        }
    });
}

/// Interpolate each channel away from (or towards) its luma.
pub fn saturation(frame: &mut Frame, intensity: f32) {
    for_each_pixel(frame, |px| {
        let gray = LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32;
        for c in &mut px[..3] {
            *c = clamp_u8((gray + intensity * (*c as f32 - gray)) as i32);
        }
    });
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (rf, gf, bf) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == rf {
        (gf - bf) / delta + if gf < bf { 6.0 } else { 0.0 }
    } else if max == gf {
        (bf - rf) / delta + 2.0
    } else {
        (rf - gf) / delta + 4.0
    };
    (h / 6.0, s, l)
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };
    [
        (r * 255.0).clamp(0.0, 255.0) as u8,
        (g * 255.0).clamp(0.0, 255.0) as u8,
        (b * 255.0).clamp(0.0, 255.0) as u8,
    ]
}

/// Rotate hue by `degrees` in HSL space.
pub fn hue(frame: &mut Frame, degrees: f32) {
    let shift = degrees / 360.0;
    for_each_pixel(frame, |px| {
        let (h, s, l) = rgb_to_hsl(px[0], px[1], px[2]);
        let rotated = (h + shift).rem_euclid(1.0);
        px[..3].copy_from_slice(&hsl_to_rgb(rotated, s, l));
    });
}

/// Warm (positive) or cool (negative) white balance shift.
pub fn temperature(frame: &mut Frame, intensity: f32) {
    let shift = (intensity * 30.0) as i32;
    for_each_pixel(frame, |px| {
        px[0] = clamp_u8(px[0] as i32 + shift);
        px[2] = clamp_u8(px[2] as i32 - shift);
    });
}

/// Green (positive) or magenta (negative) tint.
pub fn tint(frame: &mut Frame, intensity: f32) {
    let green = (intensity * 30.0) as i32;
    let magenta = (-intensity * 15.0) as i32;
    for_each_pixel(frame, |px| {
        px[1] = clamp_u8(px[1] as i32 + green);
        px[0] = clamp_u8(px[0] as i32 + magenta);
        px[2] = clamp_u8(px[2] as i32 + magenta);
    });
}

/// Blend towards the classic sepia tone matrix by `intensity`.
pub fn sepia(frame: &mut Frame, intensity: f32) {
    let tone = Mat3::from_cols(
        Vec3::new(0.393, 0.349, 0.272),
        Vec3::new(0.769, 0.686, 0.534),
        Vec3::new(0.189, 0.168, 0.131),
    );
    for_each_pixel(frame, |px| {
        let rgb = Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32);
        let toned = tone * rgb;
        for (c, target) in px[..3].iter_mut().zip(toned.to_array()) {
            let original = *c as f32;
            let target = target as i32 as f32;
            *c = clamp_u8((original + intensity * (target - original)) as i32);
        }
    });
}

pub fn grayscale(frame: &mut Frame) {
    for_each_pixel(frame, |px| {
        let gray = (LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32)
            .clamp(0.0, 255.0) as u8;
        px[..3].fill(gray);
    });
}

pub fn invert(frame: &mut Frame) {
    for_each_pixel(frame, |px| {
        for c in &mut px[..3] {
            *c = 255 - *c;
        }
    });
}

/// Darken towards the corners with a quadratic falloff from the centre.
pub fn vignette(frame: &mut Frame, intensity: f32) {
    if frame.is_empty() {
        return;
    }
    let center = Vec2::new(frame.width as f32 / 2.0, frame.height as f32 / 2.0);
    let max_dist = center.length();
    let row_bytes = frame.width as usize * 4;

    frame
        .data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let dist = Vec2::new(x as f32, y as f32).distance(center);
                let factor = (1.0 - intensity * (dist / max_dist).powi(2)).max(0.0);
                for c in &mut px[..3] {
                    *c = (*c as f32 * factor).clamp(0.0, 255.0) as u8;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgba: [u8; 4]) -> Frame {
        Frame::filled(4, 4, rgba)
    }

    #[test]
    fn test_brightness_offsets_and_clamps() {
        let mut frame = solid([100, 250, 5, 77]);
        brightness(&mut frame, 0.1);
        assert_eq!(frame.pixel(0, 0), Some([125, 255, 30, 77]));
        brightness(&mut frame, -1.0);
        assert_eq!(frame.pixel(3, 3), Some([0, 0, 0, 77]));
    }

    #[test]
    fn test_contrast_identity_at_zero() {
        let mut frame = solid([10, 128, 240, 255]);
        contrast(&mut frame, 0.0);
        assert_eq!(frame.pixel(0, 0), Some([10, 128, 240, 255]));
        contrast(&mut frame, 1.0);
        assert_eq!(frame.pixel(0, 0), Some([0, 128, 255, 255]));
    }

    #[test]
    fn test_saturation_zero_is_gray() {
        let mut frame = solid([255, 0, 0, 255]);
        saturation(&mut frame, 0.0);
        let px = frame.pixel(1, 1).unwrap();
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert!((px[0] as i32 - 76).abs() <= 1);
    }

    #[test]
    fn test_hue_rotation_primary() {
        let mut frame = solid([255, 0, 0, 255]);
        hue(&mut frame, 120.0);
        let px = frame.pixel(0, 0).unwrap();
        assert!(px[0] <= 1 && px[1] >= 254 && px[2] <= 1, "{px:?}");

        let mut white = solid([255, 255, 255, 255]);
        hue(&mut white, 200.0);
        assert_eq!(white.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_temperature_and_tint() {
        let mut warm = solid([100, 100, 100, 255]);
        temperature(&mut warm, 0.5);
        assert_eq!(warm.pixel(0, 0), Some([115, 100, 85, 255]));

        let mut green = solid([100, 100, 100, 255]);
        tint(&mut green, 1.0);
        assert_eq!(green.pixel(0, 0), Some([85, 130, 85, 255]));
    }

    #[test]
    fn test_sepia_full_and_none() {
        let mut none = solid([50, 60, 70, 255]);
        sepia(&mut none, 0.0);
        assert_eq!(none.pixel(0, 0), Some([50, 60, 70, 255]));

        let mut white = solid([255, 255, 255, 255]);
        sepia(&mut white, 1.0);
        let px = white.pixel(0, 0).unwrap();
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 255);
        assert!((px[2] as i32 - 212).abs() <= 1);
    }

    #[test]
    fn test_grayscale_and_invert() {
        let mut frame = solid([255, 255, 255, 9]);
        grayscale(&mut frame);
        assert!(frame.pixel(0, 0).unwrap()[0] >= 254);
        invert(&mut frame);
        assert_eq!(frame.pixel(0, 0).unwrap()[3], 9);
        assert!(frame.pixel(0, 0).unwrap()[0] <= 1);
    }

    #[test]
    fn test_vignette_centre_untouched() {
        let mut frame = Frame::filled(4, 4, [200, 200, 200, 255]);
        vignette(&mut frame, 1.0);
        assert_eq!(frame.pixel(2, 2), Some([200, 200, 200, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
        let edge = frame.pixel(2, 0).unwrap();
        assert!(edge[0] > 0 && edge[0] < 200);
    }
}
