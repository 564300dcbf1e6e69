//! Reelcut Media - collaborator contracts for media I/O
//!
//! The editing core never touches container formats itself. This crate
//! defines the seams it calls through:
//! - [`Decoder`] for video frames and source probing
//! - [`AudioSource`] for fully decoded PCM
//! - [`Encoder`] for export output
//! - [`PresentationSink`] for preview display
//!
//! Reference implementations cover synthetic sources, in-memory PCM, an
//! FFmpeg pipe encoder, and in-memory capture for tests.

pub mod audio_source;
pub mod decoder;
pub mod encoder;
pub mod sink;

pub use audio_source::{AudioSource, MemoryAudioSource};
pub use decoder::{Decoder, SourceInfo, SyntheticDecoder, SyntheticPattern};
pub use encoder::{EncodedOutput, Encoder, ExportSettings, FfmpegEncoder, MemoryEncoder};
pub use sink::{FrameCapture, MemoryFrameSink, NullSink, PresentationSink};
