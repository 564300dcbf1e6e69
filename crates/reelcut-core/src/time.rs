//! Time representation for sample- and frame-accurate editing.
//!
//! Every timeline and source position is a signed 64-bit count of
//! microseconds. Frame rates stay rational so that 29.97 fps projects step
//! through the timeline without drift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point or span in time, in microseconds.
pub type Micros = i64;

/// Microseconds in one second.
pub const MICROS_PER_SECOND: Micros = 1_000_000;

/// Number of sample frames covering `duration` at `sample_rate`, truncated.
///
/// Negative durations yield zero.
#[inline]
pub fn micros_to_sample_frames(duration: Micros, sample_rate: u32) -> usize {
    if duration <= 0 {
        return 0;
    }
    (duration as i128 * sample_rate as i128 / MICROS_PER_SECOND as i128) as usize
}

/// Duration in microseconds of `frames` sample frames at `sample_rate`.
#[inline]
pub fn sample_frames_to_micros(frames: usize, sample_rate: u32) -> Micros {
    if sample_rate == 0 {
        return 0;
    }
    (frames as i128 * MICROS_PER_SECOND as i128 / sample_rate as i128) as Micros
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Whole-number frame rate.
    #[inline]
    pub const fn from_fps(fps: u32) -> Self {
        Self::new(fps, 1)
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame in microseconds, truncated.
    ///
    /// Returns zero for a degenerate rate with a zero numerator.
    #[inline]
    pub fn frame_interval(self) -> Micros {
        if self.numerator == 0 {
            return 0;
        }
        MICROS_PER_SECOND * self.denominator as Micros / self.numerator as Micros
    }

    /// Whether both terms are non-zero.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
