//! A small built-in project on synthetic media.

use std::sync::Arc;

use anyhow::{Context, Result};
use reelcut_core::{AudioSample, EffectParams, FrameRate, Micros, MICROS_PER_SECOND};
use reelcut_engine::{Collaborators, Engine, EngineConfig};
use reelcut_media::{MemoryAudioSource, NullSink, SourceInfo, SyntheticDecoder, SyntheticPattern};
use tracing::info;

const BARS: &str = "synthetic://bars";
const TINT: &str = "synthetic://tint";
const TONE: &str = "synthetic://tone";

/// One second per bar clip, four seconds in total.
const DEMO_LENGTH: Micros = 4 * MICROS_PER_SECOND;

/// Build an engine whose timeline holds two bar clips, a translucent
/// overlay, and a tone on the mixer.
pub fn build(config: EngineConfig) -> Result<Engine> {
    let (width, height) = (config.project.width, config.project.height);
    let decoder = SyntheticDecoder::new();
    decoder.register(
        BARS,
        SourceInfo {
            width,
            height,
            duration_us: DEMO_LENGTH,
            fps: config.project.fps,
        },
        SyntheticPattern::Bars,
    );
    decoder.register(
        TINT,
        SourceInfo {
            width: width / 2,
            height: height / 2,
            duration_us: DEMO_LENGTH,
            fps: FrameRate::FPS_30,
        },
        SyntheticPattern::Solid([255, 255, 255, 96]),
    );

    let audio = MemoryAudioSource::new();
    audio.insert(
        TONE,
        tone(440.0, config.audio.sample_rate, config.audio.channels),
    );

    let engine = Engine::new(
        config,
        Collaborators {
            decoder: Arc::new(decoder),
            audio: Arc::new(audio),
            sink: Box::new(NullSink),
        },
    )?;

    let first = engine.add_clip(BARS, 0, 0)?;
    engine.trim_clip(first, 0, DEMO_LENGTH / 2);
    let second = engine.add_clip(BARS, 0, DEMO_LENGTH / 2)?;
    engine.trim_clip(second, DEMO_LENGTH / 2, 0);
    engine.set_clip_speed(second, 2.0);

    engine
        .add_filter(second, EffectParams::new("vignette", 0.6))
        .context("vignette filter rejected")?;
    engine
        .add_filter(second, EffectParams::new("sepia", 0.8))
        .context("sepia filter rejected")?;

    let overlay = engine.add_clip(TINT, 1, MICROS_PER_SECOND)?;
    engine.trim_clip(overlay, 0, DEMO_LENGTH - MICROS_PER_SECOND);
    engine
        .add_filter(overlay, EffectParams::new("blur", 2.0))
        .context("blur filter rejected")?;

    engine.add_audio_track(TONE, 0)?;

    info!(
        clips = engine.timeline().clip_count(),
        duration_us = engine.duration(),
        "Built demo project"
    );
    Ok(engine)
}

/// Sine tone at half scale covering the demo length.
fn tone(frequency: f32, sample_rate: u32, channels: u16) -> AudioSample {
    let frames = (DEMO_LENGTH * sample_rate as Micros / MICROS_PER_SECOND) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let value = (t * frequency * std::f32::consts::TAU).sin() * i16::MAX as f32 * 0.5;
        for _ in 0..channels {
            samples.push(value as i16);
        }
    }
    AudioSample::new(samples, sample_rate, channels)
}
