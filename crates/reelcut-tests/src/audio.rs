//! Integration tests for the audio subsystem.

use reelcut_audio::{AudioMixer, OutputFormat};
use reelcut_core::{AudioSample, TrackId};

use crate::support::fixture;

#[test]
fn two_loud_tracks_clip_at_max() {
    let fx = fixture();
    fx.pcm("a.wav", 20_000, 1);
    fx.pcm("b.wav", 20_000, 1);
    fx.engine.add_audio_track("a.wav", 0).unwrap();
    fx.engine.add_audio_track("b.wav", 0).unwrap();

    let mixed = fx.engine.mixed_audio(0, 100_000);
    assert_eq!(mixed.samples.len(), 4_410 * 2);
    assert!(mixed.samples.iter().all(|&s| s == i16::MAX));
}

#[test]
fn muted_and_zero_volume_tracks_are_silent() {
    let fx = fixture();
    fx.pcm("a.wav", 8_000, 1);
    let muted = fx.engine.add_audio_track("a.wav", 0).unwrap();
    let quiet = fx.engine.add_audio_track("a.wav", 0).unwrap();
    assert!(fx.engine.set_audio_muted(muted, true));
    assert!(fx.engine.set_audio_volume(quiet, 0.0));

    assert!(fx
        .engine
        .mixed_audio(0, 50_000)
        .samples
        .iter()
        .all(|&s| s == 0));

    assert!(fx.engine.set_audio_muted(muted, false));
    assert!(fx
        .engine
        .mixed_audio(0, 50_000)
        .samples
        .iter()
        .all(|&s| s == 8_000));
}

#[test]
fn track_and_master_gain_multiply() {
    let fx = fixture();
    fx.pcm("a.wav", 16_000, 1);
    let id = fx.engine.add_audio_track("a.wav", 0).unwrap();
    fx.engine.set_audio_volume(id, 0.5);
    fx.engine.set_master_volume(0.25);
    assert!(fx
        .engine
        .mixed_audio(0, 10_000)
        .samples
        .iter()
        .all(|&s| s == 2_000));
}

#[test]
fn voiceover_starting_mid_window_is_offset() {
    let fx = fixture();
    fx.pcm("vo.wav", 300, 1);
    fx.engine.add_voiceover("vo.wav", 50_000).unwrap();

    let mixed = fx.engine.mixed_audio(0, 100_000);
    let lead = 2_205 * 2;
    assert!(mixed.samples[..lead].iter().all(|&s| s == 0));
    assert!(mixed.samples[lead..].iter().all(|&s| s == 300));
}

#[test]
fn window_past_every_track_is_silent() {
    let fx = fixture();
    fx.pcm("a.wav", 1_000, 1);
    fx.engine.add_audio_track("a.wav", 0).unwrap();
    let mixed = fx.engine.mixed_audio(1_000_000, 20_000);
    assert_eq!(mixed.timestamp_us, 1_000_000);
    assert!(mixed.samples.iter().all(|&s| s == 0));
}

#[test]
fn unknown_source_is_audio_error() {
    let fx = fixture();
    assert!(fx.engine.add_audio_track("nothing.wav", 0).is_err());
    assert_eq!(fx.engine.mixer().track_count(), 0);
}

#[test]
fn mono_output_format() {
    let mixer = AudioMixer::new(OutputFormat {
        sample_rate: 8_000,
        channels: 1,
    });
    let id = mixer.add_track(0, AudioSample::new(vec![100; 8_000], 8_000, 1));
    assert_eq!(id, TrackId(1));
    let mixed = mixer.get_mixed_audio(0, 1_000_000);
    assert_eq!(mixed.samples.len(), 8_000);
    assert_eq!(mixed.channels, 1);
    assert!(mixed.samples.iter().all(|&s| s == 100));
}
