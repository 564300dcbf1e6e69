//! Reelcut Timeline - clip placement and temporal mapping
//!
//! Implements the timeline structure for the editing engine:
//! - Clips placed on numbered tracks with trims, speed and volume
//! - Splitting, trimming and moving with derived duration bookkeeping
//! - Position and range queries in compositing order

pub mod clip;
pub mod timeline;

pub use clip::{Clip, PLACEHOLDER_SOURCE_DURATION};
pub use timeline::{Timeline, DEFAULT_TRACK_COUNT};
