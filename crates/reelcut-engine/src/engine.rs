//! The engine facade: one entry point for every editing, preview, playback
//! and export operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use reelcut_audio::{AudioMixer, OutputFormat};
use reelcut_compositor::Compositor;
use reelcut_core::{
    AudioSample, ClipId, EffectParams, FilterId, Frame, FrameRate, Micros, ReelcutError, Result,
    TrackId,
};
use reelcut_effects::{FilterInstance, FilterPipeline};
use reelcut_media::{AudioSource, Decoder, Encoder, ExportSettings, PresentationSink};
use reelcut_timeline::{Clip, Timeline};
use tracing::{error, info, warn};

use crate::config::{EngineConfig, ProjectConfig};
use crate::export::{ExportCancel, ExportHandle, ExportJob};
use crate::playback::Playback;
use crate::renderer::RenderContext;

/// External services the engine calls through.
pub struct Collaborators {
    pub decoder: Arc<dyn Decoder>,
    pub audio: Arc<dyn AudioSource>,
    pub sink: Box<dyn PresentationSink>,
}

/// Owns the editing components and the worker contexts that drive them.
pub struct Engine {
    ctx: Arc<RenderContext>,
    audio_source: Arc<dyn AudioSource>,
    project: Mutex<ProjectConfig>,
    playback: Playback,
    exporting: Arc<AtomicBool>,
    export_cancel: Mutex<Option<ExportCancel>>,
}

impl Engine {
    /// Validate `config` and build every component.
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Result<Self> {
        if let Err(e) = config.validate() {
            error!(error = %e, "Engine initialization failed");
            return Err(ReelcutError::Initialization(e.to_string()));
        }
        let project = config.project;
        let mixer = AudioMixer::new(OutputFormat {
            sample_rate: config.audio.sample_rate,
            channels: config.audio.channels,
        });
        mixer.set_master_volume(config.audio.master_volume);

        let ctx = RenderContext::new(
            Timeline::new(),
            Compositor::new(project.width, project.height),
            FilterPipeline::new(),
            mixer,
            collaborators.decoder,
        );
        info!(
            width = project.width,
            height = project.height,
            fps = %project.fps,
            sample_rate = config.audio.sample_rate,
            channels = config.audio.channels,
            "Engine initialized"
        );
        Ok(Self {
            ctx: Arc::new(ctx),
            audio_source: collaborators.audio,
            project: Mutex::new(project),
            playback: Playback::new(collaborators.sink),
            exporting: Arc::new(AtomicBool::new(false)),
            export_cancel: Mutex::new(None),
        })
    }

    // ── Project ──────────────────────────────────────────────────

    /// Start an empty project at the given resolution and rate. Clips and
    /// filters are dropped and the playhead returns to zero; audio tracks
    /// are kept.
    pub fn create_project(&self, width: u32, height: u32, fps: FrameRate) -> Result<()> {
        if width == 0 || height == 0 || !fps.is_valid() {
            warn!(width, height, fps = %fps, "Rejected project settings");
            return Err(ReelcutError::InvalidParameter(format!(
                "Invalid project {width}x{height} at {}/{}",
                fps.numerator, fps.denominator
            )));
        }
        self.playback.stop();
        let _edits = self.ctx.edits.lock();
        self.ctx.timeline.clear();
        self.ctx.filters.clear();
        self.ctx.compositor.resize(width, height);
        *self.project.lock() = ProjectConfig { width, height, fps };
        info!(width, height, fps = %fps, "Created project");
        Ok(())
    }

    pub fn project(&self) -> ProjectConfig {
        *self.project.lock()
    }

    pub fn frame_interval(&self) -> Micros {
        self.project.lock().fps.frame_interval()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.ctx.timeline
    }

    pub fn compositor(&self) -> &Compositor {
        &self.ctx.compositor
    }

    pub fn filter_pipeline(&self) -> &FilterPipeline {
        &self.ctx.filters
    }

    pub fn mixer(&self) -> &AudioMixer {
        &self.ctx.mixer
    }

    // ── Timeline ─────────────────────────────────────────────────

    /// Probe `source` and place it on the timeline with its real duration.
    /// Nothing is added if the probe fails.
    pub fn add_clip(&self, source: &str, track_index: u32, position: Micros) -> Result<ClipId> {
        let info = self.ctx.decoder.probe(source)?;
        let _edits = self.ctx.edits.lock();
        let id = self.ctx.timeline.add_clip(source, track_index, position);
        if !self.ctx.timeline.refresh_source_duration(id, info.duration_us) {
            warn!(clip = %id, duration_us = info.duration_us, "Keeping placeholder source duration");
        }
        Ok(id)
    }

    /// Remove a clip along with its filters.
    pub fn remove_clip(&self, id: ClipId) -> bool {
        let _edits = self.ctx.edits.lock();
        if !self.ctx.timeline.remove_clip(id) {
            return false;
        }
        self.ctx.filters.clear_clip(id);
        true
    }

    pub fn move_clip(&self, id: ClipId, track_index: u32, position: Micros) -> bool {
        self.ctx.timeline.move_clip(id, track_index, position)
    }

    pub fn trim_clip(&self, id: ClipId, trim_start: Micros, trim_end: Micros) -> bool {
        self.ctx.timeline.trim_clip(id, trim_start, trim_end)
    }

    /// Split a clip; the new tail clip inherits copies of its filters. No
    /// frame ever sees the tail before its chain is in place.
    pub fn split_clip(&self, id: ClipId, position: Micros) -> Option<ClipId> {
        let _edits = self.ctx.edits.lock();
        let tail = self.ctx.timeline.split_clip(id, position)?;
        self.ctx.filters.copy_filters(id, tail);
        Some(tail)
    }

    pub fn set_clip_speed(&self, id: ClipId, speed: f32) -> bool {
        self.ctx.timeline.set_clip_speed(id, speed)
    }

    pub fn set_clip_volume(&self, id: ClipId, volume: f32) -> bool {
        self.ctx.timeline.set_clip_volume(id, volume)
    }

    pub fn clips_at_position(&self, position: Micros) -> Vec<Clip> {
        self.ctx.timeline.clips_at_position(position)
    }

    pub fn clips_in_range(&self, start: Micros, end: Micros) -> Vec<Clip> {
        self.ctx.timeline.clips_in_range(start, end)
    }

    pub fn duration(&self) -> Micros {
        self.ctx.timeline.duration()
    }

    // ── Filters ──────────────────────────────────────────────────

    /// Attach a filter to an existing clip. Serialized with clip removal, so
    /// a chain never outlives its clip.
    pub fn add_filter(&self, clip: ClipId, params: EffectParams) -> Option<FilterId> {
        let _edits = self.ctx.edits.lock();
        if self.ctx.timeline.get_clip(clip).is_none() {
            warn!(clip = %clip, "Cannot add filter to unknown clip");
            return None;
        }
        self.ctx.filters.add_filter(clip, params)
    }

    pub fn remove_filter(&self, clip: ClipId, filter: FilterId) -> bool {
        self.ctx.filters.remove_filter(clip, filter)
    }

    pub fn update_filter(&self, clip: ClipId, filter: FilterId, params: EffectParams) -> bool {
        self.ctx.filters.update_filter(clip, filter, params)
    }

    pub fn filters(&self, clip: ClipId) -> Vec<FilterInstance> {
        self.ctx.filters.filters(clip)
    }

    pub fn available_filters(&self) -> Vec<&'static str> {
        FilterPipeline::available_filters()
    }

    // ── Audio ────────────────────────────────────────────────────

    /// Decode `source` in full and place it on the mixer at `position`.
    pub fn add_audio_track(&self, source: &str, position: Micros) -> Result<TrackId> {
        let pcm = self.audio_source.decode_audio(source)?;
        if pcm.channels == 0 || pcm.sample_rate == 0 {
            return Err(ReelcutError::Audio(format!(
                "{source} has no usable audio ({} Hz x {} channels)",
                pcm.sample_rate, pcm.channels
            )));
        }
        Ok(self.ctx.mixer.add_track(position, pcm))
    }

    /// A recorded voiceover is mixed like any other audio track.
    pub fn add_voiceover(&self, source: &str, position: Micros) -> Result<TrackId> {
        self.add_audio_track(source, position)
    }

    pub fn remove_audio_track(&self, id: TrackId) -> bool {
        self.ctx.mixer.remove_track(id)
    }

    pub fn set_audio_volume(&self, id: TrackId, volume: f32) -> bool {
        self.ctx.mixer.set_volume(id, volume)
    }

    pub fn set_audio_muted(&self, id: TrackId, muted: bool) -> bool {
        self.ctx.mixer.set_muted(id, muted)
    }

    pub fn set_master_volume(&self, volume: f32) -> bool {
        self.ctx.mixer.set_master_volume(volume)
    }

    // ── Rendering ────────────────────────────────────────────────

    pub fn preview_frame(&self, position: Micros) -> Frame {
        self.ctx.render_frame(position)
    }

    pub fn mixed_audio(&self, position: Micros, duration: Micros) -> AudioSample {
        self.ctx.mixed_audio(position, duration)
    }

    // ── Playback ─────────────────────────────────────────────────

    pub fn play(&self) -> bool {
        self.playback
            .play(Arc::clone(&self.ctx), self.frame_interval())
    }

    pub fn pause(&self) {
        self.playback.pause();
    }

    pub fn stop(&self) {
        self.playback.stop();
    }

    pub fn seek_to(&self, position: Micros) {
        self.playback.seek_to(position, self.ctx.timeline.duration());
    }

    pub fn position(&self) -> Micros {
        self.playback.position()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    // ── Export ───────────────────────────────────────────────────

    /// Start exporting the whole timeline. Fails with
    /// [`ReelcutError::ExportInProgress`] while another export runs.
    pub fn export(&self, settings: ExportSettings, encoder: Box<dyn Encoder>) -> Result<ExportHandle> {
        if self
            .exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Export requested while another is running");
            return Err(ReelcutError::ExportInProgress);
        }
        info!(
            output = %settings.output_path.display(),
            width = settings.width,
            height = settings.height,
            "Starting export"
        );
        let job = ExportJob {
            ctx: Arc::clone(&self.ctx),
            settings,
            encoder,
            frame_interval: self.frame_interval(),
        };
        let handle = job.spawn(Arc::clone(&self.exporting))?;
        *self.export_cancel.lock() = Some(handle.cancel_token());
        Ok(handle)
    }

    /// Ask the running export to stop. Returns `false` if none is running.
    pub fn cancel_export(&self) -> bool {
        if !self.is_exporting() {
            return false;
        }
        match self.export_cancel.lock().as_ref() {
            Some(cancel) => {
                cancel.cancel();
                info!("Export cancellation requested");
                true
            }
            None => false,
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    // ── Not supported ────────────────────────────────────────────

    pub fn add_transition(&self, from: ClipId, to: ClipId, kind: &str, duration: Micros) {
        warn!(from = %from, to = %to, kind, duration, "Transitions are not supported");
    }

    pub fn remove_transition(&self, from: ClipId, to: ClipId) {
        warn!(from = %from, to = %to, "Transitions are not supported");
    }

    pub fn add_text(&self, text: &str, position: Micros, duration: Micros) {
        warn!(text, position, duration, "Text overlays are not supported");
    }

    pub fn update_text(&self, index: usize, text: &str) {
        warn!(index, text, "Text overlays are not supported");
    }

    pub fn remove_text(&self, index: usize) {
        warn!(index, "Text overlays are not supported");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.playback.stop();
        if let Some(cancel) = self.export_cancel.lock().as_ref() {
            cancel.cancel();
        }
    }
}
