//! Reelcut Compositor - frame transforms and layer blending
//!
//! Provides:
//! - Aspect-fit alpha-over compositing of clip layers
//! - Bilinear scaling, cropping, rotation and mirroring
//! - BT.601 RGBA ↔ I420 conversion for the encoder boundary

pub mod compositor;
pub mod transform;
pub mod yuv;

pub use compositor::Compositor;
pub use transform::ClipGeometry;
