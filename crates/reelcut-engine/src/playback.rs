//! The preview render loop.
//!
//! A dedicated thread wakes every millisecond, and once at least one frame
//! interval of wall time has passed it advances the playhead by the elapsed
//! time, renders, and hands the frame to the presentation sink. Reaching the
//! end of the timeline stops playback with the playhead parked on the end.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reelcut_core::Micros;
use reelcut_media::PresentationSink;
use tracing::{debug, error, info};

use crate::renderer::RenderContext;

const TICK: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
struct PlayheadState {
    playing: AtomicBool,
    position: AtomicI64,
}

/// Play/pause/seek control over the render loop thread.
pub struct Playback {
    state: Arc<PlayheadState>,
    sink: Arc<Mutex<Box<dyn PresentationSink>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Playback {
    pub fn new(sink: Box<dyn PresentationSink>) -> Self {
        Self {
            state: Arc::new(PlayheadState::default()),
            sink: Arc::new(Mutex::new(sink)),
            worker: Mutex::new(None),
        }
    }

    /// Start the render loop from the current position. A playhead already
    /// at or past the end rewinds to zero first. Returns `false` if playback
    /// was already running or could not start.
    pub fn play(&self, ctx: Arc<RenderContext>, frame_interval: Micros) -> bool {
        if frame_interval <= 0 {
            error!(frame_interval, "Refusing to play with a non-positive frame interval");
            return false;
        }
        let mut worker = self.worker.lock();
        if self.state.playing.swap(true, Ordering::AcqRel) {
            return false;
        }
        // A loop that ran off the end leaves its handle behind.
        if let Some(finished) = worker.take() {
            let _ = finished.join();
        }

        let duration = ctx.timeline.duration();
        if self.state.position.load(Ordering::Acquire) >= duration {
            self.state.position.store(0, Ordering::Release);
        }

        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        let spawned = thread::Builder::new()
            .name("reelcut-playback".into())
            .spawn(move || render_loop(&state, &sink, &ctx, frame_interval));
        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                info!(
                    position = self.state.position.load(Ordering::Acquire),
                    frame_interval, "Playback started"
                );
                true
            }
            Err(e) => {
                self.state.playing.store(false, Ordering::Release);
                error!(error = %e, "Failed to spawn playback thread");
                false
            }
        }
    }

    /// Stop the loop and keep the playhead where it is.
    pub fn pause(&self) {
        let mut worker = self.worker.lock();
        let was_playing = self.state.playing.swap(false, Ordering::AcqRel);
        if let Some(handle) = worker.take() {
            let _ = handle.join();
        }
        if was_playing {
            info!(position = self.position(), "Playback paused");
        }
    }

    /// Stop the loop and rewind to zero.
    pub fn stop(&self) {
        self.pause();
        self.state.position.store(0, Ordering::Release);
        debug!("Playback stopped");
    }

    /// Move the playhead, clamped to `[0, duration]`.
    pub fn seek_to(&self, position: Micros, duration: Micros) {
        let clamped = position.clamp(0, duration.max(0));
        self.state.position.store(clamped, Ordering::Release);
        debug!(position = clamped, "Seeked");
    }

    pub fn position(&self) -> Micros {
        self.state.position.load(Ordering::Acquire)
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::Acquire)
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.pause();
    }
}

fn render_loop(
    state: &PlayheadState,
    sink: &Mutex<Box<dyn PresentationSink>>,
    ctx: &RenderContext,
    frame_interval: Micros,
) {
    let mut last = Instant::now();
    while state.playing.load(Ordering::Acquire) {
        thread::sleep(TICK);
        let elapsed = last.elapsed().as_micros() as Micros;
        if elapsed < frame_interval {
            continue;
        }
        last = Instant::now();

        let duration = ctx.timeline.duration();
        let position = state.position.fetch_add(elapsed, Ordering::AcqRel) + elapsed;
        if position >= duration {
            state.position.store(duration, Ordering::Release);
            state.playing.store(false, Ordering::Release);
            info!(position = duration, "Playback reached end of timeline");
            break;
        }

        let frame = ctx.render_frame(position);
        if let Err(e) = sink.lock().present(&frame) {
            debug!(position, error = %e, "Presentation sink rejected frame");
        }
    }
}
