//! Engine configuration, stored as JSON.

use std::path::Path;

use reelcut_core::{FrameRate, ReelcutError, Result};
use serde::{Deserialize, Serialize};

/// Top-level engine configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub project: ProjectConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
}

/// Output canvas and frame pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub width: u32,
    pub height: u32,
    pub fps: FrameRate,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: FrameRate::FPS_30,
        }
    }
}

/// Mixer output format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Master volume (0.0 to 1.0).
    pub master_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            master_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ReelcutError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReelcutError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let ProjectConfig { width, height, fps } = self.project;
        if width == 0 || height == 0 {
            return Err(ReelcutError::Config(format!(
                "Project size must be non-zero, got {width}x{height}"
            )));
        }
        if !fps.is_valid() {
            return Err(ReelcutError::Config(format!(
                "Invalid frame rate {}/{}",
                fps.numerator, fps.denominator
            )));
        }
        if self.audio.sample_rate == 0 || self.audio.channels == 0 {
            return Err(ReelcutError::Config(format!(
                "Audio format must be non-zero, got {} Hz x {} channels",
                self.audio.sample_rate, self.audio.channels
            )));
        }
        Ok(())
    }
}
