//! Per-clip filter chains.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use reelcut_core::{ClipId, EffectParams, FilterId, Frame, IdAllocator};
use tracing::{debug, info, warn};

use crate::filter::{FilterInstance, FilterKind};

#[derive(Debug, Default)]
struct PipelineState {
    clip_filters: BTreeMap<ClipId, Vec<FilterInstance>>,
    ids: IdAllocator,
}

impl PipelineState {
    fn find_mut(&mut self, clip: ClipId, filter: FilterId) -> Option<&mut FilterInstance> {
        self.clip_filters
            .get_mut(&clip)?
            .iter_mut()
            .find(|f| f.id == filter)
    }
}

/// Owns every filter instance, grouped by clip in insertion order.
///
/// Filter ids come from one pipeline-wide counter, so an id identifies a
/// filter across all clips.
#[derive(Debug, Default)]
pub struct FilterPipeline {
    state: Mutex<PipelineState>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags accepted by [`FilterPipeline::add_filter`].
    pub fn available_filters() -> Vec<&'static str> {
        FilterKind::ALL.iter().map(|k| k.tag()).collect()
    }

    /// Append a filter to `clip`'s chain. Unknown type tags are rejected.
    pub fn add_filter(&self, clip: ClipId, params: EffectParams) -> Option<FilterId> {
        let Some(kind) = FilterKind::from_tag(&params.type_tag) else {
            warn!(clip = %clip, tag = %params.type_tag, "Unknown filter type");
            return None;
        };
        let mut state = self.state.lock();
        let id = FilterId(state.ids.next_raw());
        state
            .clip_filters
            .entry(clip)
            .or_default()
            .push(FilterInstance { id, kind, params });
        info!(clip = %clip, filter = %id, kind = %kind, "Added filter");
        Some(id)
    }

    pub fn remove_filter(&self, clip: ClipId, filter: FilterId) -> bool {
        let mut state = self.state.lock();
        let Some(chain) = state.clip_filters.get_mut(&clip) else {
            return false;
        };
        let Some(index) = chain.iter().position(|f| f.id == filter) else {
            return false;
        };
        chain.remove(index);
        if chain.is_empty() {
            state.clip_filters.remove(&clip);
        }
        info!(clip = %clip, filter = %filter, "Removed filter");
        true
    }

    /// Replace a filter's parameters in place, keeping its position. The new
    /// tag may name a different kind but must be known.
    pub fn update_filter(&self, clip: ClipId, filter: FilterId, params: EffectParams) -> bool {
        let Some(kind) = FilterKind::from_tag(&params.type_tag) else {
            warn!(clip = %clip, tag = %params.type_tag, "Unknown filter type");
            return false;
        };
        let mut state = self.state.lock();
        let Some(instance) = state.find_mut(clip, filter) else {
            return false;
        };
        instance.kind = kind;
        instance.params = params;
        info!(clip = %clip, filter = %filter, kind = %kind, "Updated filter");
        true
    }

    /// Run `clip`'s chain over `frame` in insertion order. Filters belonging
    /// to other clips are never applied.
    pub fn apply_filters(&self, frame: &mut Frame, clip: ClipId) {
        let state = self.state.lock();
        let Some(chain) = state.clip_filters.get(&clip) else {
            return;
        };
        for instance in chain {
            debug!(clip = %clip, filter = %instance.id, kind = %instance.kind, "Applying filter");
            instance.apply(frame);
        }
    }

    /// Snapshot of `clip`'s chain.
    pub fn filters(&self, clip: ClipId) -> Vec<FilterInstance> {
        self.state
            .lock()
            .clip_filters
            .get(&clip)
            .cloned()
            .unwrap_or_default()
    }

    /// Append copies of `from`'s chain to `to`, each with a fresh id.
    /// Returns the number of filters copied.
    pub fn copy_filters(&self, from: ClipId, to: ClipId) -> usize {
        let mut state = self.state.lock();
        let Some(source) = state.clip_filters.get(&from).cloned() else {
            return 0;
        };
        let copies: Vec<FilterInstance> = source
            .into_iter()
            .map(|f| FilterInstance {
                id: FilterId(state.ids.next_raw()),
                ..f
            })
            .collect();
        let count = copies.len();
        state.clip_filters.entry(to).or_default().extend(copies);
        info!(from = %from, to = %to, count, "Copied filters");
        count
    }

    /// Drop `clip`'s chain, returning how many filters were removed.
    pub fn clear_clip(&self, clip: ClipId) -> usize {
        let removed = self
            .state
            .lock()
            .clip_filters
            .remove(&clip)
            .map_or(0, |chain| chain.len());
        if removed > 0 {
            info!(clip = %clip, removed, "Cleared clip filters");
        }
        removed
    }

    pub fn filter_count(&self) -> usize {
        self.state.lock().clip_filters.values().map(Vec::len).sum()
    }

    /// Drop every chain. Ids keep counting up.
    pub fn clear(&self) {
        self.state.lock().clip_filters.clear();
        info!("Cleared filter pipeline");
    }
}
