//! Reelcut Core - Foundation types for the editing engine
//!
//! This crate provides the fundamental types shared by every Reelcut crate:
//! - Microsecond time values and frame rates
//! - RGBA frames and interleaved PCM sample buffers
//! - Stable identifiers for clips, filters and audio tracks
//! - Effect parameters crossing the engine boundary

pub mod audio;
pub mod error;
pub mod frame;
pub mod id;
pub mod params;
pub mod time;

pub use audio::AudioSample;
pub use error::{ReelcutError, Result};
pub use frame::{Frame, PixelFormat};
pub use id::{ClipId, FilterId, IdAllocator, TrackId};
pub use params::EffectParams;
pub use time::{
    micros_to_sample_frames, sample_frames_to_micros, FrameRate, Micros, MICROS_PER_SECOND,
};
