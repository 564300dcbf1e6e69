//! The export task.
//!
//! Renders positions `0, interval, 2 * interval, ...` strictly before the
//! timeline end on a background thread and feeds each frame to an encoder.
//! Progress and the outcome travel back over a channel: zero or more
//! [`ExportEvent::Progress`] events, then exactly one terminal event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use reelcut_core::{Micros, ReelcutError, Result};
use reelcut_media::{Encoder, ExportSettings};
use tracing::{debug, error, info, warn};

use crate::renderer::RenderContext;

/// Export progress and outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// Sent after each encoded frame. `fraction` is in `(0, 1]`.
    Progress { fraction: f32, status: String },
    Completed { frames: u64 },
    Cancelled { frames: u64 },
    Failed { message: String },
}

impl ExportEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone, Default)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. The task stops at the next frame boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A running export.
#[derive(Debug)]
pub struct ExportHandle {
    events: Receiver<ExportEvent>,
    cancel: ExportCancel,
    worker: Option<JoinHandle<()>>,
}

impl ExportHandle {
    pub fn events(&self) -> &Receiver<ExportEvent> {
        &self.events
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> ExportCancel {
        self.cancel.clone()
    }

    /// Block until the task finishes and return every event not yet received.
    pub fn wait(mut self) -> Vec<ExportEvent> {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Export thread panicked");
            }
        }
        self.events.try_iter().collect()
    }
}

/// Clears the engine's busy flag when the task ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub(crate) struct ExportJob {
    pub ctx: Arc<RenderContext>,
    pub settings: ExportSettings,
    pub encoder: Box<dyn Encoder>,
    pub frame_interval: Micros,
}

impl ExportJob {
    /// Start the job on its own thread. `busy` must already be set by the
    /// caller; it is cleared when the thread exits.
    pub fn spawn(self, busy: Arc<AtomicBool>) -> Result<ExportHandle> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let cancel = ExportCancel::new();
        let token = cancel.clone();
        let guard = BusyGuard(busy);

        let worker = std::thread::Builder::new()
            .name("reelcut-export".into())
            .spawn(move || {
                let _guard = guard;
                self.run(&token, &tx);
            })
            .map_err(|e| ReelcutError::Internal(format!("Failed to spawn export thread: {e}")))?;

        Ok(ExportHandle {
            events: rx,
            cancel,
            worker: Some(worker),
        })
    }

    fn run(mut self, cancel: &ExportCancel, events: &Sender<ExportEvent>) {
        let terminal = match self.encode_all(cancel, events) {
            Ok(Outcome::Completed(frames)) => {
                info!(frames, output = %self.settings.output_path.display(), "Export completed");
                ExportEvent::Completed { frames }
            }
            Ok(Outcome::Cancelled(frames)) => {
                info!(frames, "Export cancelled");
                ExportEvent::Cancelled { frames }
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                ExportEvent::Failed {
                    message: e.to_string(),
                }
            }
        };
        // The receiver may already be gone; nothing left to tell.
        let _ = events.send(terminal);
    }

    fn encode_all(&mut self, cancel: &ExportCancel, events: &Sender<ExportEvent>) -> Result<Outcome> {
        if self.frame_interval <= 0 {
            return Err(ReelcutError::InvalidParameter(format!(
                "Frame interval must be positive, got {}",
                self.frame_interval
            )));
        }
        let duration = self.ctx.timeline.duration();
        let total = frame_count(duration, self.frame_interval);
        info!(duration, total_frames = total, "Export started");

        self.encoder.configure(&self.settings)?;

        let (width, height) = (self.settings.width, self.settings.height);
        let mut frames = 0u64;
        let mut position = 0;
        while position < duration {
            if cancel.is_cancelled() {
                if let Err(e) = self.encoder.finalize() {
                    warn!(error = %e, "Finalize after cancel failed");
                }
                return Ok(Outcome::Cancelled(frames));
            }

            let mut frame = self.ctx.render_frame(position);
            if (frame.width, frame.height) != (width, height) {
                frame = self.ctx.compositor.scale(&frame, width, height);
            }
            self.encoder.encode_frame(&frame)?;
            frames += 1;

            let fraction = frames as f32 / total as f32;
            debug!(position, frames, "Encoded frame");
            let _ = events.send(ExportEvent::Progress {
                fraction,
                status: format!("Encoded frame {frames}/{total}"),
            });
            position += self.frame_interval;
        }

        self.encoder.finalize()?;
        Ok(Outcome::Completed(frames))
    }
}

enum Outcome {
    Completed(u64),
    Cancelled(u64),
}

/// Number of positions `0, interval, ...` strictly before `duration`.
pub fn frame_count(duration: Micros, interval: Micros) -> u64 {
    if duration <= 0 || interval <= 0 {
        return 0;
    }
    ((duration + interval - 1) / interval) as u64
}
