//! Branch records owned by the growth engine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mode::GrowthMode;
use crate::color::Color;
use crate::{direction, polar_to_cartesian};

/// A growing line segment
///
/// The end point is derived from `start`, `angle` and `length`; renderers
/// draw up to [`Branch::current_end`] while the branch is still growing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub start: Vec2,
    /// Heading in radians
    pub angle: f32,
    pub length: f32,
    /// Depth from the stroke-seeded ancestor (0 = seeded from the stroke)
    pub generation: u32,
    /// Growth counter, always within `0..=max_progress`
    pub progress: f32,
    pub max_progress: f32,
    pub color: Color,
    /// Generation-0 color of this lineage; the palette blends away from it
    pub root_color: Color,
    /// Base opacity assigned at creation
    pub opacity: f32,
    /// Idle oscillation added on top of `opacity` once fully grown
    #[serde(default)]
    pub pulse: f32,
    /// Last growth tick or fork (ms); gates the spawn cooldown
    pub last_growth_time: f64,
    /// Mode the branch was grown in
    pub mode: GrowthMode,
    /// Phase offset for the pulse so siblings don't blink in unison
    #[serde(default)]
    pub pulse_phase: f32,
}

impl Branch {
    /// Full-length end point
    #[inline]
    pub fn end(&self) -> Vec2 {
        self.start + polar_to_cartesian(self.length, self.angle)
    }

    /// End point of the grown portion
    #[inline]
    pub fn current_end(&self) -> Vec2 {
        self.start + direction(self.angle) * self.length * self.progress_fraction()
    }

    /// Growth in 0..=1
    #[inline]
    pub fn progress_fraction(&self) -> f32 {
        if self.max_progress <= 0.0 {
            1.0
        } else {
            (self.progress / self.max_progress).clamp(0.0, 1.0)
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.progress >= self.max_progress
    }

    /// Opacity a renderer should use, including the idle pulse
    #[inline]
    pub fn display_opacity(&self) -> f32 {
        (self.opacity + self.pulse).clamp(0.0, 1.0)
    }
}
