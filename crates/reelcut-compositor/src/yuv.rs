//! BT.601 integer RGBA ↔ I420 conversion.
//!
//! I420 layout: full-resolution Y plane, then U, then V, each chroma plane
//! `ceil(w/2)`×`ceil(h/2)`. Chroma comes from the averaged RGB of each 2×2
//! block (partial blocks at odd edges average what they have).

use reelcut_core::{Frame, PixelFormat, ReelcutError, Result};

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline]
fn luma(r: i32, g: i32, b: i32) -> u8 {
    clamp_u8(((66 * r + 129 * g + 25 * b + 128) >> 8) + 16)
}

#[inline]
fn chroma(r: i32, g: i32, b: i32) -> (u8, u8) {
    let u = ((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128;
    let v = ((112 * r - 94 * g - 18 * b + 128) >> 8) + 128;
    (clamp_u8(u), clamp_u8(v))
}

fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(ReelcutError::DimensionMismatch { expected, got });
    }
    Ok(())
}

/// Convert an RGBA frame to a planar I420 frame of the same dimensions.
pub fn rgba_to_yuv420(src: &Frame) -> Result<Frame> {
    if src.format != PixelFormat::Rgba8 {
        return Err(ReelcutError::InvalidParameter(format!(
            "expected RGBA input, got {:?}",
            src.format
        )));
    }
    let (w, h) = (src.width as usize, src.height as usize);
    check_len(PixelFormat::Rgba8.frame_size(src.width, src.height), src.data.len())?;

    let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
    let mut out = vec![0u8; PixelFormat::Yuv420P.frame_size(src.width, src.height)];
    let (y_plane, chroma_planes) = out.split_at_mut(w * h);
    let (u_plane, v_plane) = chroma_planes.split_at_mut(cw * ch);

    for (i, px) in src.data.chunks_exact(4).enumerate() {
        y_plane[i] = luma(px[0] as i32, px[1] as i32, px[2] as i32);
    }

    for cy in 0..ch {
        for cx in 0..cw {
            let (mut r, mut g, mut b, mut n) = (0i32, 0i32, 0i32, 0i32);
            for y in (cy * 2)..(cy * 2 + 2).min(h) {
                for x in (cx * 2)..(cx * 2 + 2).min(w) {
                    let i = (y * w + x) * 4;
                    r += src.data[i] as i32;
                    g += src.data[i + 1] as i32;
                    b += src.data[i + 2] as i32;
                    n += 1;
                }
            }
            let (u, v) = chroma(r / n, g / n, b / n);
            u_plane[cy * cw + cx] = u;
            v_plane[cy * cw + cx] = v;
        }
    }

    Ok(Frame {
        data: out,
        width: src.width,
        height: src.height,
        format: PixelFormat::Yuv420P,
        timestamp_us: src.timestamp_us,
    })
}

/// Convert raw I420 bytes back to an opaque RGBA frame.
pub fn yuv420_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Frame> {
    check_len(PixelFormat::Yuv420P.frame_size(width, height), data.len())?;

    let (w, h) = (width as usize, height as usize);
    let cw = w.div_ceil(2);
    let (y_plane, chroma_planes) = data.split_at(w * h);
    let (u_plane, v_plane) = chroma_planes.split_at(cw * h.div_ceil(2));

    let mut out = Frame::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let c = y_plane[y * w + x] as i32 - 16;
            let ci = (y / 2) * cw + x / 2;
            let d = u_plane[ci] as i32 - 128;
            let e = v_plane[ci] as i32 - 128;

            let i = (y * w + x) * 4;
            out.data[i] = clamp_u8((298 * c + 409 * e + 128) >> 8);
            out.data[i + 1] = clamp_u8((298 * c - 100 * d - 208 * e + 128) >> 8);
            out.data[i + 2] = clamp_u8((298 * c + 516 * d + 128) >> 8);
            out.data[i + 3] = 255;
        }
    }
    Ok(out)
}

/// Convert an I420 frame produced by [`rgba_to_yuv420`] back to RGBA.
pub fn yuv_frame_to_rgba(src: &Frame) -> Result<Frame> {
    if src.format != PixelFormat::Yuv420P {
        return Err(ReelcutError::InvalidParameter(format!(
            "expected I420 input, got {:?}",
            src.format
        )));
    }
    Ok(yuv420_to_rgba(&src.data, src.width, src.height)?.with_timestamp(src.timestamp_us))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_and_black_levels() {
        let white = rgba_to_yuv420(&Frame::filled(2, 2, [255, 255, 255, 255])).unwrap();
        assert_eq!(white.format, PixelFormat::Yuv420P);
        assert_eq!(white.data, vec![235, 235, 235, 235, 128, 128]);

        let black = rgba_to_yuv420(&Frame::filled(2, 2, [0, 0, 0, 255])).unwrap();
        assert_eq!(black.data, vec![16, 16, 16, 16, 128, 128]);
    }

    #[test]
    fn test_grey_round_trip_exact() {
        for level in [0u8, 255] {
            let src = Frame::filled(3, 3, [level, level, level, 255]);
            let yuv = rgba_to_yuv420(&src).unwrap();
            let back = yuv_frame_to_rgba(&yuv).unwrap();
            assert_eq!(back, src);
        }
    }

    #[test]
    fn test_round_trip_is_close() {
        let src = Frame::filled(4, 4, [200, 60, 30, 255]);
        let back = yuv_frame_to_rgba(&rgba_to_yuv420(&src).unwrap()).unwrap();
        for (a, b) in src.data.iter().zip(back.data.iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 4, "{a} vs {b}");
        }
    }

    #[test]
    fn test_odd_dimensions_round_chroma_up() {
        let yuv = rgba_to_yuv420(&Frame::filled(3, 1, [0, 0, 0, 255])).unwrap();
        assert_eq!(yuv.data.len(), 3 + 2 + 2);
    }

    #[test]
    fn test_wrong_buffer_size() {
        let err = yuv420_to_rgba(&[0u8; 5], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            ReelcutError::DimensionMismatch { expected: 6, got: 5 }
        ));
    }
}
