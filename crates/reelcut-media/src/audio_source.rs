//! PCM source contract.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use reelcut_core::{AudioSample, ReelcutError, Result};
use tracing::info;

/// Decodes a source's whole audio stream into interleaved 16-bit PCM.
pub trait AudioSource: Send + Sync {
    fn decode_audio(&self, source: &str) -> Result<AudioSample>;
}

/// Serves PCM buffers inserted ahead of time.
#[derive(Debug, Default)]
pub struct MemoryAudioSource {
    buffers: Mutex<BTreeMap<String, AudioSample>>,
}

impl MemoryAudioSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, source: impl Into<String>, pcm: AudioSample) {
        let source = source.into();
        info!(
            source = %source,
            sample_rate = pcm.sample_rate,
            channels = pcm.channels,
            samples = pcm.samples.len(),
            "Stored PCM source"
        );
        self.buffers.lock().insert(source, pcm);
    }
}

impl AudioSource for MemoryAudioSource {
    fn decode_audio(&self, source: &str) -> Result<AudioSample> {
        self.buffers
            .lock()
            .get(source)
            .cloned()
            .ok_or_else(|| ReelcutError::Audio(format!("No audio for source: {source}")))
    }
}
