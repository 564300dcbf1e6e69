//! Integration tests for timeline editing through the engine.
//!
//! Exercises reelcut-timeline against real probed durations from
//! reelcut-media and the filter bookkeeping in reelcut-effects.

use reelcut_core::{ClipId, EffectParams};
use reelcut_timeline::{Timeline, PLACEHOLDER_SOURCE_DURATION};

use crate::support::fixture;

// ── Layout ─────────────────────────────────────────────────────

#[test]
fn duration_is_latest_clip_end() {
    let fx = fixture();
    fx.solid("a", 5_000_000, [1, 1, 1, 255]);
    fx.solid("b", 3_000_000, [2, 2, 2, 255]);
    assert_eq!(fx.engine.duration(), 0);

    fx.engine.add_clip("a", 0, 0).unwrap();
    fx.engine.add_clip("b", 1, 0).unwrap();
    assert_eq!(fx.engine.duration(), 5_000_000);
}

#[test]
fn ids_increase_and_are_never_reused() {
    let fx = fixture();
    fx.solid("a", 1_000_000, [0, 0, 0, 255]);
    let first = fx.engine.add_clip("a", 0, 0).unwrap();
    let second = fx.engine.add_clip("a", 0, 1_000_000).unwrap();
    assert_eq!((first, second), (ClipId(1), ClipId(2)));

    assert!(fx.engine.remove_clip(second));
    assert!(!fx.engine.remove_clip(second));
    assert_eq!(fx.engine.add_clip("a", 0, 0).unwrap(), ClipId(3));
}

#[test]
fn placeholder_duration_until_refreshed() {
    let timeline = Timeline::new();
    let id = timeline.add_clip("unprobed.mov", 0, 0);
    assert_eq!(timeline.duration(), PLACEHOLDER_SOURCE_DURATION);

    assert!(timeline.refresh_source_duration(id, 2_000_000));
    assert!(!timeline.refresh_source_duration(id, 4_000_000));
    assert_eq!(timeline.duration(), 2_000_000);
}

#[test]
fn clips_at_position_sorted_by_track() {
    let fx = fixture();
    fx.solid("a", 2_000_000, [0, 0, 0, 255]);
    let top = fx.engine.add_clip("a", 2, 0).unwrap();
    let bottom = fx.engine.add_clip("a", 0, 0).unwrap();
    let middle = fx.engine.add_clip("a", 1, 500_000).unwrap();

    let order: Vec<ClipId> = fx
        .engine
        .clips_at_position(600_000)
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(order, vec![bottom, middle, top]);
    assert_eq!(fx.engine.clips_at_position(100_000).len(), 2);
    assert!(fx.engine.clips_at_position(2_500_000).is_empty());
}

#[test]
fn clips_in_range_is_half_open() {
    let fx = fixture();
    fx.solid("a", 1_000_000, [0, 0, 0, 255]);
    fx.engine.add_clip("a", 0, 0).unwrap();
    let late = fx.engine.add_clip("a", 0, 2_000_000).unwrap();

    assert_eq!(fx.engine.clips_in_range(1_000_000, 2_000_000).len(), 0);
    let hits = fx.engine.clips_in_range(1_500_000, 2_000_001);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, late);
}

// ── Trim, speed, split ─────────────────────────────────────────

#[test]
fn over_trim_collapses_to_zero_duration() {
    let fx = fixture();
    fx.solid("a", 4_000_000, [0, 0, 0, 255]);
    let id = fx.engine.add_clip("a", 0, 0).unwrap();

    assert!(fx.engine.trim_clip(id, 3_000_000, 3_000_000));
    let clip = fx.engine.timeline().get_clip(id).unwrap();
    assert_eq!(clip.trim_start, 3_000_000);
    assert_eq!(clip.trim_end, 1_000_000);
    assert_eq!(clip.trim_start + clip.trim_end, clip.source_duration);
    assert_eq!(clip.duration, 0);
}

#[test]
fn speed_change_rescales_duration() {
    let fx = fixture();
    fx.solid("a", 4_000_000, [0, 0, 0, 255]);
    let id = fx.engine.add_clip("a", 0, 0).unwrap();

    assert!(fx.engine.set_clip_speed(id, 2.0));
    assert_eq!(fx.engine.duration(), 2_000_000);
    assert!(fx.engine.set_clip_speed(id, 100.0));
    let clip = fx.engine.timeline().get_clip(id).unwrap();
    assert_eq!(clip.speed, 10.0);
    assert_eq!(clip.duration, 400_000);
}

#[test]
fn split_preserves_total_duration_and_source_mapping() {
    let fx = fixture();
    fx.solid("a", 6_000_000, [0, 0, 0, 255]);
    let id = fx.engine.add_clip("a", 0, 1_000_000).unwrap();
    fx.engine.trim_clip(id, 1_000_000, 1_000_000);
    let before = fx.engine.timeline().get_clip(id).unwrap();

    let tail = fx.engine.split_clip(id, 2_500_000).unwrap();
    let head = fx.engine.timeline().get_clip(id).unwrap();
    let tail = fx.engine.timeline().get_clip(tail).unwrap();

    assert_eq!(head.duration + tail.duration, before.duration);
    assert_eq!(tail.start_time, 2_500_000);
    assert_eq!(head.end_time(), tail.start_time);
    assert_eq!(tail.source_time_at(2_500_000), before.source_time_at(2_500_000));
    assert_eq!(fx.engine.duration(), before.end_time());
}

#[test]
fn split_outside_clip_leaves_it_untouched() {
    let fx = fixture();
    fx.solid("a", 2_000_000, [0, 0, 0, 255]);
    let id = fx.engine.add_clip("a", 0, 1_000_000).unwrap();
    let before = fx.engine.timeline().get_clip(id).unwrap();

    assert!(fx.engine.split_clip(id, 1_000_000).is_none());
    assert!(fx.engine.split_clip(id, 3_000_000).is_none());
    assert!(fx.engine.split_clip(ClipId(99), 1_500_000).is_none());
    assert_eq!(fx.engine.timeline().get_clip(id).unwrap(), before);
    assert_eq!(fx.engine.timeline().clip_count(), 1);
}

#[test]
fn split_tail_inherits_filter_chain() {
    let fx = fixture();
    fx.solid("a", 2_000_000, [0, 0, 0, 255]);
    let id = fx.engine.add_clip("a", 0, 0).unwrap();
    fx.engine
        .add_filter(id, EffectParams::new("brightness", 0.2))
        .unwrap();
    fx.engine
        .add_filter(id, EffectParams::new("blur", 1.0))
        .unwrap();

    let tail = fx.engine.split_clip(id, 1_000_000).unwrap();
    let kinds = |clip| {
        fx.engine
            .filters(clip)
            .iter()
            .map(|f| f.kind.tag())
            .collect::<Vec<_>>()
    };
    assert_eq!(kinds(tail), vec!["brightness", "blur"]);
    assert_eq!(kinds(id), kinds(tail));
}

#[test]
fn move_changes_track_and_duration() {
    let fx = fixture();
    fx.solid("a", 1_000_000, [0, 0, 0, 255]);
    let id = fx.engine.add_clip("a", 0, 0).unwrap();
    assert!(fx.engine.move_clip(id, 5, 4_000_000));
    assert_eq!(fx.engine.duration(), 5_000_000);
    assert_eq!(fx.engine.timeline().track_count(), 6);
    assert!(!fx.engine.move_clip(ClipId(42), 0, 0));
}
