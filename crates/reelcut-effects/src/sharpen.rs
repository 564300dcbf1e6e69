//! Laplacian sharpen and unsharp masking.

use rayon::prelude::*;
use reelcut_core::Frame;

use crate::blur::box_blur;

/// 3×3 cross sharpen on RGB. Alpha and the one-pixel border are copied
/// through; frames narrower or shorter than 3 pixels are left as is.
pub fn sharpen(frame: &mut Frame, intensity: f32) {
    if frame.width < 3 || frame.height < 3 {
        return;
    }
    let (w, h) = (frame.width as usize, frame.height as usize);
    let kernel = [
        [0.0, -intensity, 0.0],
        [-intensity, 1.0 + 4.0 * intensity, -intensity],
        [0.0, -intensity, 0.0],
    ];
    let src = &frame.data;
    let mut out = src.clone();

    out.par_chunks_exact_mut(w * 4)
        .enumerate()
        .filter(|(y, _)| *y > 0 && *y < h - 1)
        .for_each(|(y, row)| {
            for x in 1..w - 1 {
                for c in 0..3 {
                    let mut sum = 0f32;
                    for (ky, kernel_row) in kernel.iter().enumerate() {
                        for (kx, weight) in kernel_row.iter().enumerate() {
                            let i = ((y + ky - 1) * w + (x + kx - 1)) * 4 + c;
                            sum += src[i] as f32 * weight;
                        }
                    }
                    row[x * 4 + c] = sum.clamp(0.0, 255.0) as u8;
                }
            }
        });
    frame.data = out;
}

/// Add back `amount` times the difference from a box-blurred copy wherever
/// that difference exceeds `threshold`.
pub fn unsharp_mask(frame: &mut Frame, amount: f32, radius: i32, threshold: i32) {
    if radius <= 0 || frame.is_empty() {
        return;
    }
    let mut blurred = frame.clone();
    box_blur(&mut blurred, radius);

    frame
        .data
        .par_chunks_exact_mut(4)
        .zip(blurred.data.par_chunks_exact(4))
        .for_each(|(px, soft)| {
            for c in 0..3 {
                let diff = px[c] as i32 - soft[c] as i32;
                if diff.abs() > threshold {
                    let sharpened = px[c] as i32 + (diff as f32 * amount) as i32;
                    px[c] = sharpened.clamp(0, 255) as u8;
                }
            }
        });
}
