//! Frame and audio rendering at a timeline position.

use std::sync::Arc;

use parking_lot::Mutex;
use reelcut_audio::AudioMixer;
use reelcut_compositor::{ClipGeometry, Compositor};
use reelcut_core::{AudioSample, Frame, Micros};
use reelcut_effects::{FilterInstance, FilterPipeline};
use reelcut_media::Decoder;
use reelcut_timeline::{Clip, Timeline};
use tracing::{debug, error};

/// The four editing components plus the decoder they render through.
///
/// Shared by the engine, the playback thread and the export task. Each
/// component carries its own lock; `edits` additionally serializes changes
/// that touch the timeline and the filter pipeline together against the
/// layer snapshot a frame is rendered from.
pub struct RenderContext {
    pub timeline: Timeline,
    pub compositor: Compositor,
    pub filters: FilterPipeline,
    pub mixer: AudioMixer,
    pub decoder: Arc<dyn Decoder>,
    pub(crate) edits: Mutex<()>,
}

impl RenderContext {
    pub fn new(
        timeline: Timeline,
        compositor: Compositor,
        filters: FilterPipeline,
        mixer: AudioMixer,
        decoder: Arc<dyn Decoder>,
    ) -> Self {
        Self {
            timeline,
            compositor,
            filters,
            mixer,
            decoder,
            edits: Mutex::new(()),
        }
    }

    /// Visible clips at `position` with their filter chains, read as one
    /// consistent view.
    fn layers_at(&self, position: Micros) -> Vec<(Clip, Vec<FilterInstance>)> {
        let _edits = self.edits.lock();
        self.timeline
            .clips_at_position(position)
            .into_iter()
            .map(|clip| {
                let chain = self.filters.filters(clip.id);
                (clip, chain)
            })
            .collect()
    }

    /// Composite every clip visible at `position`, lowest track first.
    ///
    /// A clip whose frame cannot be decoded is logged and left out; the rest
    /// of the stack still renders.
    pub fn render_frame(&self, position: Micros) -> Frame {
        let mut output = self.compositor.canvas(position);
        let layers = self.layers_at(position);
        debug!(position, layers = layers.len(), "Rendering frame");

        for (clip, chain) in layers {
            let source_time = clip.source_time_at(position);
            let mut layer = match self.decoder.decode_frame(&clip.source_ref, source_time) {
                Ok(frame) => frame,
                Err(e) => {
                    error!(
                        clip = %clip.id,
                        source = %clip.source_ref,
                        source_time,
                        error = %e,
                        "Decode failed, skipping layer"
                    );
                    continue;
                }
            };
            for filter in &chain {
                filter.apply(&mut layer);
            }
            self.compositor
                .composite(&mut output, &layer, &ClipGeometry::default());
        }
        output
    }

    pub fn mixed_audio(&self, position: Micros, duration: Micros) -> AudioSample {
        self.mixer.get_mixed_audio(position, duration)
    }
}
