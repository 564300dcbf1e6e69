//! The clip arena and every temporal layout operation on it.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use reelcut_core::{ClipId, IdAllocator, Micros};
use tracing::{debug, info, warn};

use crate::clip::Clip;

/// Tracks present in a fresh timeline (video, overlay, audio).
pub const DEFAULT_TRACK_COUNT: u32 = 3;

#[derive(Debug)]
struct TimelineState {
    clips: BTreeMap<ClipId, Clip>,
    ids: IdAllocator,
    duration: Micros,
}

impl TimelineState {
    fn recompute_duration(&mut self) {
        self.duration = self.clips.values().map(Clip::end_time).max().unwrap_or(0).max(0);
    }

    fn next_id(&mut self) -> ClipId {
        ClipId(self.ids.next_raw())
    }
}

/// Owns every clip and serializes access through one lock.
///
/// Lookups on unknown ids return `false` or `None`; nothing here panics on
/// caller input.
#[derive(Debug)]
pub struct Timeline {
    state: Mutex<TimelineState>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TimelineState {
                clips: BTreeMap::new(),
                ids: IdAllocator::new(),
                duration: 0,
            }),
        }
    }

    /// Place a new clip. Source duration starts as a placeholder until
    /// [`Timeline::refresh_source_duration`] supplies the real value.
    pub fn add_clip(&self, source_ref: &str, track_index: u32, position: Micros) -> ClipId {
        let mut state = self.state.lock();
        let id = state.next_id();
        state
            .clips
            .insert(id, Clip::new(id, source_ref, track_index, position));
        state.recompute_duration();
        info!(clip = %id, source = source_ref, track = track_index, position, "Added clip");
        id
    }

    pub fn remove_clip(&self, id: ClipId) -> bool {
        let mut state = self.state.lock();
        if state.clips.remove(&id).is_none() {
            return false;
        }
        state.recompute_duration();
        info!(clip = %id, "Removed clip");
        true
    }

    /// Replace the placeholder source duration. Only the first refresh with a
    /// positive duration succeeds.
    pub fn refresh_source_duration(&self, id: ClipId, source_duration: Micros) -> bool {
        let mut state = self.state.lock();
        let Some(clip) = state.clips.get_mut(&id) else {
            return false;
        };
        if clip.source_duration_known || source_duration <= 0 {
            warn!(clip = %id, source_duration, "Rejected source duration refresh");
            return false;
        }
        clip.source_duration = source_duration;
        clip.source_duration_known = true;
        let (ts, te) = (clip.trim_start, clip.trim_end);
        clip.apply_trim(ts, te);
        state.recompute_duration();
        debug!(clip = %id, source_duration, "Refreshed source duration");
        true
    }

    pub fn move_clip(&self, id: ClipId, track_index: u32, position: Micros) -> bool {
        let mut state = self.state.lock();
        let Some(clip) = state.clips.get_mut(&id) else {
            return false;
        };
        clip.track_index = track_index;
        clip.start_time = position;
        state.recompute_duration();
        info!(clip = %id, track = track_index, position, "Moved clip");
        true
    }

    pub fn trim_clip(&self, id: ClipId, trim_start: Micros, trim_end: Micros) -> bool {
        let mut state = self.state.lock();
        let Some(clip) = state.clips.get_mut(&id) else {
            return false;
        };
        clip.apply_trim(trim_start, trim_end);
        let (ts, te, dur) = (clip.trim_start, clip.trim_end, clip.duration);
        state.recompute_duration();
        info!(clip = %id, trim_start = ts, trim_end = te, duration = dur, "Trimmed clip");
        true
    }

    /// Split a clip at timeline `position`, returning the id of the new tail
    /// clip. The original clip is left untouched on failure.
    pub fn split_clip(&self, id: ClipId, position: Micros) -> Option<ClipId> {
        let mut state = self.state.lock();
        let contains = state.clips.get(&id).map(|c| c.start_time < position && position < c.end_time());
        if contains != Some(true) {
            return None;
        }

        let tail_id = state.next_id();
        let tail = state.clips.get_mut(&id)?.split_at(position, tail_id)?;
        state.clips.insert(tail_id, tail);
        state.recompute_duration();
        info!(clip = %id, tail = %tail_id, position, "Split clip");
        Some(tail_id)
    }

    pub fn set_clip_speed(&self, id: ClipId, speed: f32) -> bool {
        let mut state = self.state.lock();
        let Some(clip) = state.clips.get_mut(&id) else {
            return false;
        };
        if !clip.apply_speed(speed) {
            warn!(clip = %id, speed, "Rejected non-finite clip speed");
            return false;
        }
        let applied = clip.speed;
        state.recompute_duration();
        info!(clip = %id, speed = applied, "Set clip speed");
        true
    }

    pub fn set_clip_volume(&self, id: ClipId, volume: f32) -> bool {
        let mut state = self.state.lock();
        let Some(clip) = state.clips.get_mut(&id) else {
            return false;
        };
        if !clip.apply_volume(volume) {
            warn!(clip = %id, volume, "Rejected non-finite clip volume");
            return false;
        }
        info!(clip = %id, volume = clip.volume, "Set clip volume");
        true
    }

    /// Clips visible at `position`, lowest track first, ties by clip id.
    pub fn clips_at_position(&self, position: Micros) -> Vec<Clip> {
        let state = self.state.lock();
        // BTreeMap iteration is already id-ordered, so a stable sort keeps ties by id
        let mut clips: Vec<Clip> = state
            .clips
            .values()
            .filter(|c| c.contains(position))
            .cloned()
            .collect();
        clips.sort_by_key(|c| c.track_index);
        clips
    }

    /// Clips overlapping `[start, end)`, ordered by clip id.
    pub fn clips_in_range(&self, start: Micros, end: Micros) -> Vec<Clip> {
        let state = self.state.lock();
        state
            .clips
            .values()
            .filter(|c| c.overlaps(start, end))
            .cloned()
            .collect()
    }

    pub fn get_clip(&self, id: ClipId) -> Option<Clip> {
        self.state.lock().clips.get(&id).cloned()
    }

    /// All clips ordered by id.
    pub fn all_clips(&self) -> Vec<Clip> {
        self.state.lock().clips.values().cloned().collect()
    }

    pub fn clip_count(&self) -> usize {
        self.state.lock().clips.len()
    }

    /// Latest clip end, or zero for an empty timeline.
    pub fn duration(&self) -> Micros {
        self.state.lock().duration
    }

    /// Number of track slots in use: the default three, or more if a clip
    /// sits on a higher track.
    pub fn track_count(&self) -> u32 {
        let state = self.state.lock();
        state
            .clips
            .values()
            .map(|c| c.track_index.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(DEFAULT_TRACK_COUNT)
    }

    /// Drop every clip. Ids keep increasing so stale handles never resolve
    /// to a new clip.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.clips.clear();
        state.duration = 0;
        info!("Cleared timeline");
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
