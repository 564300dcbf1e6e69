//! Reelcut Effects - CPU filter kernels and per-clip filter chains
//!
//! Provides color adjustments, box/Gaussian/motion blur, sharpening and
//! the [`FilterPipeline`] that owns every clip's ordered filter list.

pub mod blur;
pub mod color;
pub mod filter;
pub mod pipeline;
pub mod sharpen;

pub use filter::{FilterCategory, FilterInstance, FilterKind};
pub use pipeline::FilterPipeline;
