//! Integration tests for preview rendering.
//!
//! Decoder, filter pipeline and compositor together, driven through the
//! engine the way the render loop drives them.

use std::time::{Duration, Instant};

use reelcut_compositor::{transform, ClipGeometry};
use reelcut_core::{EffectParams, Frame};
use reelcut_media::SyntheticPattern;

use crate::support::{fixture, info, HEIGHT, WIDTH};

#[test]
fn top_track_covers_lower_tracks() {
    let fx = fixture();
    fx.solid("red", 1_000_000, [255, 0, 0, 255]);
    fx.solid("green", 1_000_000, [0, 255, 0, 255]);
    fx.engine.add_clip("green", 1, 0).unwrap();
    fx.engine.add_clip("red", 0, 0).unwrap();

    let frame = fx.engine.preview_frame(0);
    assert_eq!((frame.width, frame.height), (WIDTH, HEIGHT));
    assert!(frame
        .data
        .chunks_exact(4)
        .all(|px| px == [0, 255, 0, 255]));
}

#[test]
fn translucent_layer_blends_over_base() {
    let fx = fixture();
    fx.solid("white", 1_000_000, [255, 255, 255, 255]);
    fx.solid("ghost", 1_000_000, [0, 0, 0, 0]);
    fx.engine.add_clip("white", 0, 0).unwrap();
    fx.engine.add_clip("ghost", 1, 0).unwrap();

    let frame = fx.engine.preview_frame(500_000);
    assert_eq!(frame.pixel(10, 5), Some([255, 255, 255, 255]));
}

#[test]
fn smaller_source_is_letterboxed() {
    let fx = fixture();
    fx.decoder.register(
        "square",
        info(10, 10, 1_000_000),
        SyntheticPattern::Solid([9, 9, 9, 255]),
    );
    fx.engine.add_clip("square", 0, 0).unwrap();

    let frame = fx.engine.preview_frame(0);
    // 10×10 fits 20×10 with a 5 px margin each side
    assert_eq!(frame.pixel(4, 5), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(5, 5), Some([9, 9, 9, 255]));
    assert_eq!(frame.pixel(14, 5), Some([9, 9, 9, 255]));
    assert_eq!(frame.pixel(15, 5), Some([0, 0, 0, 0]));
}

#[test]
fn filters_never_leak_between_clips() {
    let fx = fixture();
    fx.solid("gray", 1_000_000, [100, 100, 100, 255]);
    let a = fx.engine.add_clip("gray", 0, 0).unwrap();
    fx.engine.add_clip("gray", 0, 1_000_000).unwrap();
    fx.engine.add_filter(a, EffectParams::new("invert", 1.0)).unwrap();

    assert_eq!(fx.engine.preview_frame(0).pixel(0, 0), Some([155, 155, 155, 255]));
    assert_eq!(
        fx.engine.preview_frame(1_000_000).pixel(0, 0),
        Some([100, 100, 100, 255])
    );
}

#[test]
fn filter_chain_runs_in_insertion_order() {
    let fx = fixture();
    fx.solid("gray", 1_000_000, [100, 100, 100, 255]);
    let id = fx.engine.add_clip("gray", 0, 0).unwrap();
    let brighten = fx
        .engine
        .add_filter(id, EffectParams::new("brightness", 0.5))
        .unwrap();
    fx.engine.add_filter(id, EffectParams::new("invert", 1.0)).unwrap();
    assert_eq!(fx.engine.preview_frame(0).pixel(0, 0), Some([28, 28, 28, 255]));

    assert!(fx.engine.remove_filter(id, brighten));
    assert_eq!(fx.engine.preview_frame(0).pixel(0, 0), Some([155, 155, 155, 255]));
}

#[test]
fn undecodable_layer_is_skipped() {
    let fx = fixture();
    fx.solid("blue", 1_000_000, [0, 0, 255, 255]);
    fx.engine.add_clip("blue", 0, 0).unwrap();
    fx.solid("red", 1_000_000, [255, 0, 0, 255]);
    fx.engine.add_clip("red", 1, 0).unwrap();
    assert_eq!(fx.engine.preview_frame(500_000).pixel(0, 0), Some([255, 0, 0, 255]));

    // The source shrinks after probing, so late timestamps no longer decode
    fx.solid("red", 100_000, [255, 0, 0, 255]);
    assert_eq!(fx.engine.preview_frame(50_000).pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(fx.engine.preview_frame(500_000).pixel(0, 0), Some([0, 0, 255, 255]));
}

#[test]
fn preview_matches_manual_pipeline() {
    let fx = fixture();
    fx.decoder
        .register("bars", info(WIDTH, HEIGHT, 2_000_000), SyntheticPattern::Bars);
    let id = fx.engine.add_clip("bars", 0, 0).unwrap();
    fx.engine
        .add_filter(id, EffectParams::new("sepia", 0.7))
        .unwrap();

    let mut layer = Frame::test_pattern(WIDTH, HEIGHT);
    fx.engine.filter_pipeline().apply_filters(&mut layer, id);
    let mut expected = Frame::new(WIDTH, HEIGHT);
    transform::composite(&mut expected, &layer, &ClipGeometry::default());

    let frame = fx.engine.preview_frame(250_000);
    assert_eq!(frame.data, expected.data);
    assert_eq!(frame.timestamp_us, 250_000);
}

#[test]
fn playback_presents_frames_and_stops_at_end() {
    let fx = fixture();
    fx.solid("a", 300_000, [1, 2, 3, 255]);
    fx.engine.add_clip("a", 0, 0).unwrap();

    assert!(fx.engine.play());
    let start = Instant::now();
    while fx.engine.is_playing() && start.elapsed() < Duration::from_secs(10) {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!fx.engine.is_playing());
    assert_eq!(fx.engine.position(), 300_000);
    let capture = fx.sink.capture();
    assert!(capture.presented >= 1);
    assert_eq!(capture.last.and_then(|f| f.pixel(0, 0)), Some([1, 2, 3, 255]));
}
