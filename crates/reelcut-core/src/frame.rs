//! Frame buffer types for video frames in CPU memory.
//!
//! Every frame flowing through the engine is tightly packed RGBA8 with no row
//! padding, so pixel `(x, y)` starts at byte `(y * width + x) * 4`. Planar
//! YUV data only exists at the encoder boundary and is tagged with
//! [`PixelFormat::Yuv420P`].

use crate::time::Micros;
use serde::{Deserialize, Serialize};

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// YUV 4:2:0 planar (I420)
    Yuv420P,
}

impl PixelFormat {
    /// Calculate total bytes needed for a frame of this format.
    ///
    /// Chroma planes of odd-sized YUV frames round up.
    pub fn frame_size(self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        match self {
            Self::Rgba8 => w * h * 4,
            Self::Yuv420P => {
                let chroma = w.div_ceil(2) * h.div_ceil(2);
                w * h + chroma * 2
            }
        }
    }
}

/// A decoded or composited video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format of `data`
    pub format: PixelFormat,
    /// Presentation timestamp
    pub timestamp_us: Micros,
}

impl Frame {
    /// Create a zeroed (transparent black) RGBA frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; PixelFormat::Rgba8.frame_size(width, height)],
            width,
            height,
            format: PixelFormat::Rgba8,
            timestamp_us: 0,
        }
    }

    /// Wrap existing RGBA bytes.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != PixelFormat::Rgba8.frame_size(width, height) {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
            timestamp_us: 0,
        })
    }

    /// A frame with no pixels.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Fill every pixel with one RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut frame = Self::new(width, height);
        for px in frame.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        frame
    }

    /// Builder-style timestamp setter.
    pub fn with_timestamp(mut self, timestamp_us: Micros) -> Self {
        self.timestamp_us = timestamp_us;
        self
    }

    /// True if the frame holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read one RGBA pixel. Out-of-bounds coordinates return `None`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Write one RGBA pixel. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        if let Some(px) = self.data.get_mut(i..i + 4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Create a test pattern frame (color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        const BARS: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];

        let mut frame = Self::new(width, height);
        if frame.is_empty() {
            return frame;
        }
        let row_bytes = width as usize * 4;
        for row in frame.data.chunks_exact_mut(row_bytes) {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let bar = (x as u64 * 8 / width as u64) as usize;
                px.copy_from_slice(&BARS[bar.min(7)]);
            }
        }
        frame
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}
