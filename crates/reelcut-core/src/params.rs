//! Effect parameters as they cross the engine boundary.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Type tag, intensity and optional auxiliary values for one filter.
///
/// The meaning of `intensity` and `aux` depends on the tag; for example
/// `motion_blur` reads its angle from `aux[0]` and `unsharp` reads radius and
/// threshold from `aux[0]` and `aux[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectParams {
    pub type_tag: String,
    pub intensity: f32,
    #[serde(default)]
    pub aux: SmallVec<[f32; 4]>,
}

impl EffectParams {
    pub fn new(type_tag: impl Into<String>, intensity: f32) -> Self {
        Self {
            type_tag: type_tag.into(),
            intensity,
            aux: SmallVec::new(),
        }
    }

    /// Append an auxiliary value.
    pub fn with_aux(mut self, value: f32) -> Self {
        self.aux.push(value);
        self
    }

    /// Auxiliary value at `index`, or `default` when absent.
    #[inline]
    pub fn aux_or(&self, index: usize, default: f32) -> f32 {
        self.aux.get(index).copied().unwrap_or(default)
    }
}
