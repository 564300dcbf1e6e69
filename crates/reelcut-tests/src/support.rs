//! Shared fixtures.

use std::sync::Arc;

use reelcut_core::{AudioSample, FrameRate, Micros};
use reelcut_engine::{Collaborators, Engine, EngineConfig, ProjectConfig};
use reelcut_media::{
    MemoryAudioSource, MemoryFrameSink, SourceInfo, SyntheticDecoder, SyntheticPattern,
};

pub const WIDTH: u32 = 20;
pub const HEIGHT: u32 = 10;

pub struct Fixture {
    pub engine: Engine,
    pub decoder: Arc<SyntheticDecoder>,
    pub audio: Arc<MemoryAudioSource>,
    pub sink: MemoryFrameSink,
}

pub fn info(width: u32, height: u32, duration_us: Micros) -> SourceInfo {
    SourceInfo {
        width,
        height,
        duration_us,
        fps: FrameRate::FPS_25,
    }
}

/// Engine on a 20×10 canvas at 25 fps with no sources registered.
pub fn fixture() -> Fixture {
    let decoder = Arc::new(SyntheticDecoder::new());
    let audio = Arc::new(MemoryAudioSource::new());
    let sink = MemoryFrameSink::new();
    let config = EngineConfig {
        project: ProjectConfig {
            width: WIDTH,
            height: HEIGHT,
            fps: FrameRate::FPS_25,
        },
        ..EngineConfig::default()
    };
    let engine = Engine::new(
        config,
        Collaborators {
            decoder: decoder.clone(),
            audio: audio.clone(),
            sink: Box::new(sink.clone()),
        },
    )
    .expect("valid config");
    Fixture {
        engine,
        decoder,
        audio,
        sink,
    }
}

impl Fixture {
    pub fn solid(&self, name: &str, duration_us: Micros, rgba: [u8; 4]) {
        self.decoder
            .register(name, info(WIDTH, HEIGHT, duration_us), SyntheticPattern::Solid(rgba));
    }

    pub fn pcm(&self, name: &str, value: i16, seconds: usize) {
        self.audio
            .insert(name, AudioSample::new(vec![value; 44_100 * 2 * seconds], 44_100, 2));
    }
}
