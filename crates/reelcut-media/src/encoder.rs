//! Encoder contract, the FFmpeg pipe encoder, and in-memory capture.
//!
//! The FFmpeg encoder spawns the `ffmpeg` binary and streams raw RGBA frames
//! into its stdin; no FFmpeg development headers are needed.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::Arc;

use parking_lot::Mutex;
use reelcut_core::{Frame, FrameRate, ReelcutError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Output parameters handed to [`Encoder::configure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: FrameRate,
    /// Video bitrate in kbps.
    pub bitrate: u32,
}

impl ExportSettings {
    pub fn new(output_path: impl Into<PathBuf>, width: u32, height: u32, fps: FrameRate) -> Self {
        Self {
            output_path: output_path.into(),
            width,
            height,
            fps,
            bitrate: 8_000,
        }
    }

    pub fn with_bitrate(mut self, kbps: u32) -> Self {
        self.bitrate = kbps;
        self
    }

    /// Bytes in one RGBA input frame.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// FFmpeg command line reading raw RGBA from stdin and writing H.264.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pixel_format".into(),
            "rgba".into(),
            "-video_size".into(),
            format!("{}x{}", self.width, self.height),
            "-framerate".into(),
            format!("{}/{}", self.fps.numerator, self.fps.denominator),
            "-i".into(),
            "pipe:0".into(),
        ];
        args.extend_from_slice(&[
            "-c:v".into(),
            "libx264".into(),
            "-b:v".into(),
            format!("{}k", self.bitrate),
            "-pix_fmt".into(),
            "yuv420p".into(),
        ]);
        args.push(self.output_path.to_string_lossy().into_owned());
        args
    }
}

/// Consumes rendered frames during export.
///
/// The export task owns its encoder, so implementations only need `Send`.
pub trait Encoder: Send {
    fn configure(&mut self, settings: &ExportSettings) -> Result<()>;

    fn encode_frame(&mut self, frame: &Frame) -> Result<()>;

    fn finalize(&mut self) -> Result<()>;
}

/// Encoder that pipes frames into an `ffmpeg` child process.
#[derive(Debug)]
pub struct FfmpegEncoder {
    program: String,
    settings: Option<ExportSettings>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific ffmpeg executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            settings: None,
            child: None,
            stdin: None,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for FfmpegEncoder {
    fn configure(&mut self, settings: &ExportSettings) -> Result<()> {
        if settings.width == 0 || settings.height == 0 || !settings.fps.is_valid() {
            return Err(ReelcutError::InvalidParameter(format!(
                "Cannot encode {}x{} at {}",
                settings.width, settings.height, settings.fps
            )));
        }
        let args = settings.ffmpeg_args();
        info!(program = %self.program, output = %settings.output_path.display(), "Spawning encoder");
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ReelcutError::Encoder(format!("Failed to spawn {}: {e}", self.program)))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelcutError::Encoder("Failed to open ffmpeg stdin".into()))?;

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.settings = Some(settings.clone());
        self.frames_written = 0;
        Ok(())
    }

    fn encode_frame(&mut self, frame: &Frame) -> Result<()> {
        let (Some(settings), Some(stdin)) = (&self.settings, self.stdin.as_mut()) else {
            return Err(ReelcutError::Encoder("Encoder not configured".into()));
        };
        if frame.data.len() != settings.frame_bytes() {
            return Err(ReelcutError::DimensionMismatch {
                expected: settings.frame_bytes(),
                got: frame.data.len(),
            });
        }
        stdin
            .write_all(&frame.data)
            .map_err(|e| ReelcutError::Encoder(format!("Failed to write frame: {e}")))?;
        self.frames_written += 1;
        debug!(frame = self.frames_written, "Wrote frame to encoder");
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        // Closing stdin signals end of stream.
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| ReelcutError::Encoder(format!("Failed to wait for ffmpeg: {e}")))?;
        if !status.success() {
            return Err(ReelcutError::Encoder(format!(
                "ffmpeg exited with status: {status}"
            )));
        }
        info!(frames = self.frames_written, "Encoder finalized");
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            warn!("Encoder dropped before finalize, killing ffmpeg");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Everything a [`MemoryEncoder`] received.
#[derive(Debug, Clone, Default)]
pub struct EncodedOutput {
    pub settings: Option<ExportSettings>,
    pub frames: Vec<Frame>,
    pub finalized: bool,
}

/// Encoder that keeps frames in memory. Clones share the same output.
#[derive(Debug, Clone, Default)]
pub struct MemoryEncoder {
    output: Arc<Mutex<EncodedOutput>>,
    fail_at: Option<usize>,
}

impl MemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when asked to encode frame number `index` (0-based).
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    /// Snapshot of what has been received so far.
    pub fn output(&self) -> EncodedOutput {
        self.output.lock().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.output.lock().frames.len()
    }
}

impl Encoder for MemoryEncoder {
    fn configure(&mut self, settings: &ExportSettings) -> Result<()> {
        let mut output = self.output.lock();
        output.settings = Some(settings.clone());
        output.frames.clear();
        output.finalized = false;
        Ok(())
    }

    fn encode_frame(&mut self, frame: &Frame) -> Result<()> {
        let mut output = self.output.lock();
        if self.fail_at == Some(output.frames.len()) {
            return Err(ReelcutError::Encoder(format!(
                "Injected failure at frame {}",
                output.frames.len()
            )));
        }
        output.frames.push(frame.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.output.lock().finalized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ExportSettings {
        ExportSettings::new("/tmp/out.mp4", 64, 32, FrameRate::FPS_29_97).with_bitrate(2_500)
    }

    #[test]
    fn test_ffmpeg_args() {
        let args = settings().ffmpeg_args();
        let joined = args.join(" ");
        assert!(joined.starts_with("-y -f rawvideo -pixel_format rgba -video_size 64x32"));
        assert!(joined.contains("-framerate 30000/1001"));
        assert!(joined.contains("-c:v libx264 -b:v 2500k -pix_fmt yuv420p"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn test_settings_serde() {
        let json = serde_json::to_string(&settings()).unwrap();
        let back: ExportSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_ffmpeg_missing_binary() {
        let mut encoder = FfmpegEncoder::with_program("reelcut-no-such-encoder-binary");
        assert!(matches!(
            encoder.configure(&settings()),
            Err(ReelcutError::Encoder(_))
        ));
        assert!(matches!(
            encoder.encode_frame(&Frame::new(64, 32)),
            Err(ReelcutError::Encoder(_))
        ));
        assert!(encoder.finalize().is_ok());
    }

    #[test]
    fn test_ffmpeg_rejects_zero_size() {
        let mut encoder = FfmpegEncoder::new();
        let bad = ExportSettings::new("/tmp/x.mp4", 0, 10, FrameRate::FPS_30);
        assert!(matches!(
            encoder.configure(&bad),
            Err(ReelcutError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_memory_encoder_shares_output() {
        let encoder = MemoryEncoder::new();
        let mut owned = encoder.clone();
        owned.configure(&settings()).unwrap();
        owned.encode_frame(&Frame::new(64, 32)).unwrap();
        owned.finalize().unwrap();

        let output = encoder.output();
        assert_eq!(output.frames.len(), 1);
        assert!(output.finalized);
        assert_eq!(output.settings, Some(settings()));
    }

    #[test]
    fn test_memory_encoder_injected_failure() {
        let mut encoder = MemoryEncoder::failing_at(1);
        encoder.configure(&settings()).unwrap();
        assert!(encoder.encode_frame(&Frame::new(1, 1)).is_ok());
        assert!(encoder.encode_frame(&Frame::new(1, 1)).is_err());
        assert_eq!(encoder.frame_count(), 1);
    }
}
