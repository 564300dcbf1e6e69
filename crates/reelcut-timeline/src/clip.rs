//! Clip types for the timeline.

use reelcut_core::{ClipId, Micros};
use serde::{Deserialize, Serialize};

/// Source duration assumed until the decoder reports the real one.
pub const PLACEHOLDER_SOURCE_DURATION: Micros = 10_000_000;

/// Allowed playback speed range.
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 10.0;

/// Allowed clip volume range.
pub const MIN_VOLUME: f32 = 0.0;
pub const MAX_VOLUME: f32 = 2.0;

/// A clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Path or handle resolved by the decoder
    pub source_ref: String,
    pub track_index: u32,
    /// Timeline position of the first visible frame
    pub start_time: Micros,
    /// Visible span on the timeline
    pub duration: Micros,
    /// Source time cut from the head
    pub trim_start: Micros,
    /// Source time cut from the tail
    pub trim_end: Micros,
    pub source_duration: Micros,
    /// Whether `source_duration` came from the decoder rather than the placeholder
    pub source_duration_known: bool,
    pub speed: f32,
    pub volume: f32,
}

impl Clip {
    /// Create an untrimmed clip with the placeholder source duration.
    pub fn new(id: ClipId, source_ref: impl Into<String>, track_index: u32, start_time: Micros) -> Self {
        Self {
            id,
            source_ref: source_ref.into(),
            track_index,
            start_time,
            duration: PLACEHOLDER_SOURCE_DURATION,
            trim_start: 0,
            trim_end: 0,
            source_duration: PLACEHOLDER_SOURCE_DURATION,
            source_duration_known: false,
            speed: 1.0,
            volume: 1.0,
        }
    }

    /// Timeline position just past the last visible frame, saturating at
    /// `Micros::MAX`.
    #[inline]
    pub fn end_time(&self) -> Micros {
        self.start_time.saturating_add(self.duration)
    }

    /// True if `position` falls in `[start_time, end_time)`.
    #[inline]
    pub fn contains(&self, position: Micros) -> bool {
        position >= self.start_time && position < self.end_time()
    }

    /// True if the clip overlaps the half-open window `[start, end)`.
    #[inline]
    pub fn overlaps(&self, start: Micros, end: Micros) -> bool {
        self.start_time < end && self.end_time() > start
    }

    /// Source time shown at timeline `position`, truncated to whole µs.
    #[inline]
    pub fn source_time_at(&self, position: Micros) -> Micros {
        self.trim_start + ((position - self.start_time) as f64 * self.speed as f64) as Micros
    }

    /// Source span remaining after both trims.
    #[inline]
    pub fn trimmed_source_span(&self) -> Micros {
        self.source_duration - self.trim_start - self.trim_end
    }

    /// Recompute `duration` from source span, trims and speed.
    pub fn recompute_duration(&mut self) {
        self.duration = (self.trimmed_source_span() as f64 / self.speed as f64) as Micros;
    }

    /// Clamp and store trims so that `trim_start + trim_end <= source_duration`.
    pub fn apply_trim(&mut self, trim_start: Micros, trim_end: Micros) {
        let src = self.source_duration.max(0);
        self.trim_start = trim_start.clamp(0, src);
        self.trim_end = trim_end.clamp(0, src - self.trim_start);
        self.recompute_duration();
    }

    /// Clamp and store `speed`. Non-finite input is rejected and the clip
    /// keeps its current speed.
    pub fn apply_speed(&mut self, speed: f32) -> bool {
        if !speed.is_finite() {
            return false;
        }
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.recompute_duration();
        true
    }

    /// Clamp and store `volume`; `false` for NaN or infinities.
    pub fn apply_volume(&mut self, volume: f32) -> bool {
        if !volume.is_finite() {
            return false;
        }
        self.volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
        true
    }

    /// Split at timeline `position`, shrinking `self` to the head.
    ///
    /// Returns the tail (carrying `tail_id`) or `None`, leaving `self`
    /// untouched, unless `start_time < position < end_time`.
    pub fn split_at(&mut self, position: Micros, tail_id: ClipId) -> Option<Clip> {
        if position <= self.start_time || position >= self.end_time() {
            return None;
        }

        let head_len = position - self.start_time;
        let split_point = self.source_time_at(position);

        let mut tail = self.clone();
        tail.id = tail_id;
        tail.start_time = position;
        tail.trim_start = split_point;
        tail.duration = self.duration - head_len;

        self.duration = head_len;
        self.trim_end = self.source_duration - split_point;

        Some(tail)
    }
}
