//! Reelcut Audio - multi-track PCM mixing
//!
//! Tracks are decoded fully into memory when added. The [`AudioMixer`]
//! produces time-windowed, gain-applied, summed and clamped interleaved
//! 16-bit output for preview and export.

pub mod mixer;

pub use mixer::{AudioMixer, AudioTrack, OutputFormat, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};
