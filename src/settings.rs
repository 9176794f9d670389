//! User preferences for growth and physics
//!
//! Persisted as a JSON document. Every field has a default so partial or
//! older files still load.

use std::fs;
use std::io;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::*;
use crate::sim::GrowthMode;

/// Options consumed when seeding and stepping growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthSettings {
    /// Density knob; seed samples per stroke point in percent
    pub branch_complexity: f32,
    /// Rate knob; 50 advances one progress unit per growth tick
    pub growth_speed: f32,
    pub drawing_mode: GrowthMode,
    /// Color of generation-0 branches
    pub selected_color: Color,
    /// Whether blooms and shape effects are forwarded to the effects layer
    pub particle_effects_enabled: bool,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            branch_complexity: 15.0,
            growth_speed: 50.0,
            drawing_mode: GrowthMode::Neural,
            selected_color: Color::default(),
            particle_effects_enabled: true,
        }
    }
}

/// Global force knobs and canvas bounds for the physics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub wind: Vec2,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub margin: f32,
    /// Build a rooted spring chain along every committed stroke
    pub anchor_strokes: bool,
    /// Mass of each chain link
    pub chain_mass: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 0.0,
            wind: Vec2::ZERO,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            margin: DEFAULT_MARGIN,
            anchor_strokes: false,
            chain_mass: 1.0,
        }
    }
}

/// All persisted preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub growth: GrowthSettings,
    pub physics: PhysicsSettings,
}

impl Settings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Using default settings ({}: {})", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
