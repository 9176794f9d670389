//! RGB color and the branch palette

use serde::{Deserialize, Serialize};

use crate::sim::GrowthMode;

/// Linear RGB color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        // Soft cyan, the default stroke color
        Self::new(0.0, 0.83, 1.0)
    }
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(hex.get(i..i + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    /// Linear blend, `t` clamped to 0..=1
    pub fn lerp(&self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

/// Color for a branch of `generation` grown in `mode`.
///
/// Generation 0 keeps the user's color; deeper generations drift toward the
/// mode accent, reaching it at the mode's deepest generation.
pub fn branch_color(base: Color, generation: u32, mode: GrowthMode) -> Color {
    if generation == 0 {
        return base;
    }
    let profile = mode.profile();
    let t = generation as f32 / profile.max_generation.max(1) as f32;
    base.lerp(profile.accent, t)
}
