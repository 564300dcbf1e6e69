//! Interleaved PCM sample buffers.

use crate::time::{sample_frames_to_micros, Micros};
use serde::{Deserialize, Serialize};

/// A block of interleaved signed 16-bit PCM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSample {
    /// Interleaved samples, `channels` values per sample frame
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp_us: Micros,
}

impl AudioSample {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
            timestamp_us: 0,
        }
    }

    /// Zero-filled buffer covering `frames` sample frames.
    pub fn silence(frames: usize, sample_rate: u32, channels: u16) -> Self {
        Self::new(vec![0; frames * channels as usize], sample_rate, channels)
    }

    /// Number of sample frames (samples per channel).
    #[inline]
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Playback length at the buffer's own sample rate.
    pub fn duration_us(&self) -> Micros {
        sample_frames_to_micros(self.frame_count(), self.sample_rate)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
