//! Filter type tags and dispatch to the kernels.

use reelcut_core::{EffectParams, FilterId, Frame};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{blur, color, sharpen};

/// Broad grouping of filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterCategory {
    Color,
    Blur,
    Sharpen,
}

/// Every filter the pipeline can run, keyed by its string tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Temperature,
    Tint,
    Sepia,
    Grayscale,
    Invert,
    Vignette,
    #[serde(rename = "blur")]
    BoxBlur,
    #[serde(rename = "gaussian")]
    GaussianBlur,
    MotionBlur,
    Sharpen,
    Unsharp,
}

impl FilterKind {
    pub const ALL: [FilterKind; 15] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Hue,
        Self::Temperature,
        Self::Tint,
        Self::Sepia,
        Self::Grayscale,
        Self::Invert,
        Self::Vignette,
        Self::BoxBlur,
        Self::GaussianBlur,
        Self::MotionBlur,
        Self::Sharpen,
        Self::Unsharp,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Hue => "hue",
            Self::Temperature => "temperature",
            Self::Tint => "tint",
            Self::Sepia => "sepia",
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::Vignette => "vignette",
            Self::BoxBlur => "blur",
            Self::GaussianBlur => "gaussian",
            Self::MotionBlur => "motion_blur",
            Self::Sharpen => "sharpen",
            Self::Unsharp => "unsharp",
        }
    }

    /// Look up a kind by tag. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn category(self) -> FilterCategory {
        match self {
            Self::BoxBlur | Self::GaussianBlur | Self::MotionBlur => FilterCategory::Blur,
            Self::Sharpen | Self::Unsharp => FilterCategory::Sharpen,
            _ => FilterCategory::Color,
        }
    }

    /// Run this filter over `frame` in place.
    pub fn apply(self, frame: &mut Frame, params: &EffectParams) {
        let i = params.intensity;
        match self {
            Self::Brightness => color::brightness(frame, i),
            Self::Contrast => color::contrast(frame, i),
            Self::Saturation => color::saturation(frame, i),
            Self::Hue => color::hue(frame, i),
            Self::Temperature => color::temperature(frame, i),
            Self::Tint => color::tint(frame, i),
            Self::Sepia => color::sepia(frame, i),
            Self::Grayscale => color::grayscale(frame),
            Self::Invert => color::invert(frame),
            Self::Vignette => color::vignette(frame, i),
            Self::BoxBlur => blur::box_blur(frame, i as i32),
            Self::GaussianBlur => blur::gaussian_blur(frame, i as i32),
            Self::MotionBlur => blur::motion_blur(frame, i as i32, params.aux_or(0, 0.0)),
            Self::Sharpen => sharpen::sharpen(frame, i),
            Self::Unsharp => sharpen::unsharp_mask(
                frame,
                i,
                params.aux_or(0, 1.0) as i32,
                params.aux_or(1, 0.0) as i32,
            ),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One filter attached to a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInstance {
    pub id: FilterId,
    pub kind: FilterKind,
    pub params: EffectParams,
}

impl FilterInstance {
    pub fn apply(&self, frame: &mut Frame) {
        self.kind.apply(frame, &self.params);
    }
}
