//! Video decoder contract and a synthetic reference decoder.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use reelcut_core::{Frame, FrameRate, Micros, ReelcutError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Stream properties reported by [`Decoder::probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    pub duration_us: Micros,
    pub fps: FrameRate,
}

/// Turns a source reference plus a source-time timestamp into an RGBA frame.
///
/// Implementations are shared between the render loop and the export task,
/// so they must be callable from several threads at once.
pub trait Decoder: Send + Sync {
    fn decode_frame(&self, source: &str, timestamp_us: Micros) -> Result<Frame>;

    fn probe(&self, source: &str) -> Result<SourceInfo>;

    fn width(&self, source: &str) -> Result<u32> {
        Ok(self.probe(source)?.width)
    }

    fn height(&self, source: &str) -> Result<u32> {
        Ok(self.probe(source)?.height)
    }

    fn duration(&self, source: &str) -> Result<Micros> {
        Ok(self.probe(source)?.duration_us)
    }

    fn fps(&self, source: &str) -> Result<FrameRate> {
        Ok(self.probe(source)?.fps)
    }
}

/// Picture a synthetic source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntheticPattern {
    /// Eight vertical color bars.
    Bars,
    /// A single flat color.
    Solid([u8; 4]),
}

#[derive(Debug, Clone, Copy)]
struct SyntheticSource {
    info: SourceInfo,
    pattern: SyntheticPattern,
}

/// Decoder over registered synthetic sources.
///
/// Unknown sources and timestamps outside `[0, duration]` fail with
/// [`ReelcutError::Decoder`].
#[derive(Debug, Default)]
pub struct SyntheticDecoder {
    sources: Mutex<BTreeMap<String, SyntheticSource>>,
}

impl SyntheticDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a source.
    pub fn register(&self, source: impl Into<String>, info: SourceInfo, pattern: SyntheticPattern) {
        let source = source.into();
        info!(
            source = %source,
            width = info.width,
            height = info.height,
            duration_us = info.duration_us,
            "Registered synthetic source"
        );
        self.sources
            .lock()
            .insert(source, SyntheticSource { info, pattern });
    }

    pub fn source_count(&self) -> usize {
        self.sources.lock().len()
    }

    fn lookup(&self, source: &str) -> Result<SyntheticSource> {
        self.sources
            .lock()
            .get(source)
            .copied()
            .ok_or_else(|| ReelcutError::Decoder(format!("Unknown source: {source}")))
    }
}

impl Decoder for SyntheticDecoder {
    fn decode_frame(&self, source: &str, timestamp_us: Micros) -> Result<Frame> {
        let entry = self.lookup(source)?;
        if timestamp_us < 0 || timestamp_us > entry.info.duration_us {
            return Err(ReelcutError::Decoder(format!(
                "Timestamp {timestamp_us}us outside {source} (0-{}us)",
                entry.info.duration_us
            )));
        }
        debug!(source, timestamp_us, "Decoding synthetic frame");
        let (w, h) = (entry.info.width, entry.info.height);
        let frame = match entry.pattern {
            SyntheticPattern::Bars => Frame::test_pattern(w, h),
            SyntheticPattern::Solid(rgba) => Frame::filled(w, h, rgba),
        };
        Ok(frame.with_timestamp(timestamp_us))
    }

    fn probe(&self, source: &str) -> Result<SourceInfo> {
        Ok(self.lookup(source)?.info)
    }
}
