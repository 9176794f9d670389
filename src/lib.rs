//! Branchwork - stroke-seeded generative growth with a mass-spring playground
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (branch growth, mass-spring physics)
//! - `sketch`: Session glue that owns both engines and queues events for effects
//! - `shape`: Contract for the external gesture classifier
//! - `settings`: Persisted user preferences
//! - `color`: RGB color and the generation palette

pub mod color;
pub mod settings;
pub mod shape;
pub mod sim;
pub mod sketch;

pub use color::Color;
pub use settings::{GrowthSettings, PhysicsSettings, Settings};
pub use sketch::{Sketch, SketchEvent};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    use std::ops::{Range, RangeInclusive};

    /// Hard ceiling on live branches
    pub const MAX_BRANCHES: usize = 500;
    /// Minimum time between growth ticks of one branch (one frame at 60 Hz)
    pub const GROWTH_TICK_MS: f64 = 16.0;
    /// `progress += growth_speed / GROWTH_SPEED_DIVISOR` per growth tick
    pub const GROWTH_SPEED_DIVISOR: f32 = 50.0;
    /// Seed branch length before the mode's length multiplier
    pub const SEED_LENGTH_RANGE: Range<f32> = 20.0..60.0;
    /// Progress units needed to finish a branch
    pub const MAX_PROGRESS_RANGE: Range<f32> = 20.0..40.0;
    /// Random delay before a fresh branch starts growing
    pub const ONSET_JITTER_MS: Range<f64> = 0.0..200.0;
    /// Child length as a fraction of parent length
    pub const CHILD_LENGTH_FACTOR: RangeInclusive<f32> = 0.6..=0.9;
    /// Opacity floor for spawned children
    pub const MIN_CHILD_OPACITY: f32 = 0.3;
    /// Opacity lost per generation when spawning
    pub const OPACITY_DECAY_PER_GENERATION: f32 = 0.15;
    /// Amplitude of the idle opacity pulse on finished branches
    pub const PULSE_AMPLITUDE: f32 = 0.08;
    /// Pulse angular rate (radians per millisecond)
    pub const PULSE_RATE: f64 = 0.004;

    /// Points closer than this are pushed apart
    pub const MIN_DISTANCE: f32 = 10.0;
    /// Drag toward the wind velocity
    pub const WIND_COEFFICIENT: f32 = 0.1;
    /// Damping along springs (scaled by each spring's own damping)
    pub const SPRING_DAMPING_COEFFICIENT: f32 = 0.05;
    /// Spring defaults used by chains
    pub const DEFAULT_STIFFNESS: f32 = 0.1;
    pub const DEFAULT_DAMPING: f32 = 0.99;
    /// Velocity multiplier applied every step
    pub const AIR_RESISTANCE: f32 = 0.999;
    /// Velocity multiplier on a wall hit (inverts and dampens)
    pub const BOUNCE_FACTOR: f32 = -0.3;
    /// Inset of the simulation bounds from the canvas edge
    pub const DEFAULT_MARGIN: f32 = 10.0;
    /// Canvas size until the host reports one
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
    /// Point count above which collision uses the grid broad phase
    pub const GRID_THRESHOLD: usize = 256;

    /// Default frame step for the demo loop (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Wrap an angle into [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    direction(theta) * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn normalize_angle_wraps_into_range() {
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(4.0 * PI + 0.5) - 0.5).abs() < 1e-5);
        let a = normalize_angle(-7.0);
        assert!((-PI..PI).contains(&a));
    }

    #[test]
    fn polar_to_cartesian_scales_direction() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }
}
