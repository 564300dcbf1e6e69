//! Presentation sink contract.

use std::sync::Arc;

use parking_lot::Mutex;
use reelcut_core::{Frame, Result};

/// Receives preview frames from the render loop.
pub trait PresentationSink: Send {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn present(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }
}

/// What a [`MemoryFrameSink`] has seen.
#[derive(Debug, Clone, Default)]
pub struct FrameCapture {
    pub presented: usize,
    pub last: Option<Frame>,
}

/// Keeps the most recent frame and a count. Clones share the capture.
#[derive(Debug, Clone, Default)]
pub struct MemoryFrameSink {
    capture: Arc<Mutex<FrameCapture>>,
}

impl MemoryFrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&self) -> FrameCapture {
        self.capture.lock().clone()
    }

    pub fn presented(&self) -> usize {
        self.capture.lock().presented
    }
}

impl PresentationSink for MemoryFrameSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut capture = self.capture.lock();
        capture.presented += 1;
        capture.last = Some(frame.clone());
        Ok(())
    }
}
