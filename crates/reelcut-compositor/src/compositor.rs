//! CPU frame compositor bound to a project resolution.
//!
//! Every method takes the compositor lock for its full duration, so callers
//! on the render loop and the export task never interleave inside one
//! operation. The same transforms are available lock-free in
//! [`crate::transform`] and [`crate::yuv`].

use parking_lot::Mutex;
use reelcut_core::{Frame, Micros, Result};
use tracing::{debug, info};

use crate::transform::{self, ClipGeometry};
use crate::yuv;

#[derive(Debug)]
struct CanvasSize {
    width: u32,
    height: u32,
}

/// Serialized frame operations at a fixed output resolution.
#[derive(Debug)]
pub struct Compositor {
    canvas: Mutex<CanvasSize>,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Mutex::new(CanvasSize { width, height }),
        }
    }

    /// Current output resolution.
    pub fn size(&self) -> (u32, u32) {
        let canvas = self.canvas.lock();
        (canvas.width, canvas.height)
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut canvas = self.canvas.lock();
        canvas.width = width;
        canvas.height = height;
        info!(width, height, "Resized compositor canvas");
    }

    /// Fresh transparent-black output frame at the project resolution.
    pub fn canvas(&self, timestamp_us: Micros) -> Frame {
        let canvas = self.canvas.lock();
        Frame::new(canvas.width, canvas.height).with_timestamp(timestamp_us)
    }

    pub fn composite(&self, dest: &mut Frame, src: &Frame, geometry: &ClipGeometry) {
        let _guard = self.canvas.lock();
        debug!(
            src_w = src.width,
            src_h = src.height,
            opacity = geometry.opacity,
            "Compositing layer"
        );
        transform::composite(dest, src, geometry);
    }

    pub fn blend(&self, dest: &mut Frame, src: &Frame, alpha: f32) {
        let _guard = self.canvas.lock();
        transform::blend(dest, src, alpha);
    }

    pub fn scale(&self, src: &Frame, width: u32, height: u32) -> Frame {
        let _guard = self.canvas.lock();
        transform::scale(src, width, height)
    }

    pub fn crop(&self, src: &Frame, x: i32, y: i32, width: u32, height: u32) -> Frame {
        let _guard = self.canvas.lock();
        transform::crop(src, x, y, width, height)
    }

    pub fn rotate(&self, src: &Frame, degrees: i32) -> Frame {
        let _guard = self.canvas.lock();
        transform::rotate(src, degrees)
    }

    pub fn flip_horizontal(&self, src: &Frame) -> Frame {
        let _guard = self.canvas.lock();
        transform::flip_horizontal(src)
    }

    pub fn flip_vertical(&self, src: &Frame) -> Frame {
        let _guard = self.canvas.lock();
        transform::flip_vertical(src)
    }

    pub fn rgba_to_yuv420(&self, src: &Frame) -> Result<Frame> {
        let _guard = self.canvas.lock();
        yuv::rgba_to_yuv420(src)
    }

    pub fn yuv420_to_rgba(&self, data: &[u8], width: u32, height: u32) -> Result<Frame> {
        let _guard = self.canvas.lock();
        yuv::yuv420_to_rgba(data, width, height)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::PixelFormat;

    #[test]
    fn test_canvas_matches_resolution() {
        let compositor = Compositor::new(64, 36);
        let frame = compositor.canvas(40_000);
        assert_eq!((frame.width, frame.height), (64, 36));
        assert_eq!(frame.timestamp_us, 40_000);
        assert!(frame.data.iter().all(|&b| b == 0));

        compositor.resize(32, 18);
        assert_eq!(compositor.size(), (32, 18));
        assert_eq!(compositor.canvas(0).data.len(), 32 * 18 * 4);
    }

    #[test]
    fn test_composite_through_lock() {
        let compositor = Compositor::new(8, 4);
        let mut out = compositor.canvas(0);
        let layer = Frame::filled(4, 4, [255, 0, 0, 255]);
        compositor.composite(&mut out, &layer, &ClipGeometry::default());
        assert_eq!(out.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(out.pixel(2, 0), Some([255, 0, 0, 255]));
        assert_eq!(out.pixel(6, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_yuv_through_lock() {
        let compositor = Compositor::default();
        let yuv = compositor
            .rgba_to_yuv420(&Frame::filled(2, 2, [0, 0, 0, 255]))
            .unwrap();
        assert_eq!(yuv.format, PixelFormat::Yuv420P);
        let back = compositor.yuv420_to_rgba(&yuv.data, 2, 2).unwrap();
        assert_eq!(back, Frame::filled(2, 2, [0, 0, 0, 255]));
    }
}
