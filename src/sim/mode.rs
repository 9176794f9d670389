//! Growth modes and their tuning tables
//!
//! Every mode-dependent number lives in [`ModeProfile`] so the growth math
//! stays identical across modes.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Drawing mode selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrowthMode {
    /// Dense, jagged, fast forking
    Electric,
    /// Sparse, long, gently curving
    Organic,
    /// Balanced between the two
    #[default]
    Neural,
}

/// Tuning constants for one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeProfile {
    /// Multiplier on the number of seed samples along a stroke
    pub density: f32,
    /// Multiplier on seed branch length
    pub length_multiplier: f32,
    /// Multiplier on the random angular jitter of seed branches
    pub angular_spread: f32,
    /// Branches created at each sampled stroke point
    pub branches_per_sample: u32,
    /// Deepest generation that may still spawn children is `max_generation - 1`
    pub max_generation: u32,
    /// Per-step spawn chance at growth speed 50
    pub spawn_probability: f64,
    /// Time a finished branch waits before it may spawn
    pub spawn_cooldown_ms: f64,
    /// Children deviate from the parent angle by up to ± this many radians
    pub child_angle_offset: f32,
    /// Palette target for deep generations
    pub accent: Color,
}

impl GrowthMode {
    pub const ALL: [GrowthMode; 3] = [GrowthMode::Electric, GrowthMode::Organic, GrowthMode::Neural];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthMode::Electric => "electric",
            GrowthMode::Organic => "organic",
            GrowthMode::Neural => "neural",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "electric" | "dense" => Some(GrowthMode::Electric),
            "organic" | "sparse" => Some(GrowthMode::Organic),
            "neural" | "balanced" => Some(GrowthMode::Neural),
            _ => None,
        }
    }

    pub fn profile(&self) -> ModeProfile {
        match self {
            GrowthMode::Electric => ModeProfile {
                density: 1.5,
                length_multiplier: 0.7,
                angular_spread: 1.6,
                branches_per_sample: 3,
                max_generation: 5,
                spawn_probability: 0.05,
                spawn_cooldown_ms: 150.0,
                child_angle_offset: 0.9,
                accent: Color::new(0.85, 0.95, 1.0),
            },
            GrowthMode::Organic => ModeProfile {
                density: 0.6,
                length_multiplier: 1.4,
                angular_spread: 0.5,
                branches_per_sample: 1,
                max_generation: 3,
                spawn_probability: 0.02,
                spawn_cooldown_ms: 500.0,
                child_angle_offset: 0.45,
                accent: Color::new(0.45, 0.8, 0.3),
            },
            GrowthMode::Neural => ModeProfile {
                density: 1.0,
                length_multiplier: 1.0,
                angular_spread: 1.0,
                branches_per_sample: 2,
                max_generation: 4,
                spawn_probability: 0.035,
                spawn_cooldown_ms: 300.0,
                child_angle_offset: 0.65,
                accent: Color::new(0.75, 0.55, 1.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for mode in GrowthMode::ALL {
            assert_eq!(GrowthMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(GrowthMode::from_str(" Dense "), Some(GrowthMode::Electric));
        assert_eq!(GrowthMode::from_str("cubist"), None);
    }

    #[test]
    fn electric_is_densest_and_organic_longest() {
        let e = GrowthMode::Electric.profile();
        let o = GrowthMode::Organic.profile();
        let n = GrowthMode::Neural.profile();
        assert!(e.density > n.density && n.density > o.density);
        assert!(o.length_multiplier > n.length_multiplier);
        assert!(e.branches_per_sample > o.branches_per_sample);
        for p in [e, o, n] {
            assert!((3..=5).contains(&p.max_generation));
            assert!((1..=3).contains(&p.branches_per_sample));
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&GrowthMode::Organic).unwrap();
        assert_eq!(json, "\"organic\"");
        let mode: GrowthMode = serde_json::from_str("\"electric\"").unwrap();
        assert_eq!(mode, GrowthMode::Electric);
    }
}
