//! Reelcut Engine - wires the editing components together
//!
//! The [`Engine`] owns the timeline, compositor, filter pipeline and audio
//! mixer, calls out to the media collaborators, and drives the two worker
//! contexts: the playback render loop and the export task.

pub mod config;
pub mod engine;
pub mod export;
pub mod logging;
pub mod playback;
pub mod renderer;

pub use config::{AudioConfig, EngineConfig, LoggingConfig, ProjectConfig};
pub use engine::{Collaborators, Engine};
pub use export::{ExportCancel, ExportEvent, ExportHandle};
pub use logging::init_logging;
pub use playback::Playback;
pub use renderer::RenderContext;
