//! Mass points, springs and distance constraints
//!
//! Springs and constraints refer to points by index into the engine's
//! point arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Index of a point in [`crate::sim::PhysicsEngine::points`]
pub type PointId = usize;

/// A point mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsPoint {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Reset to zero at the start of every step
    pub acc: Vec2,
    /// Force queued by `apply_force`, consumed by the next step
    #[serde(default)]
    pub external: Vec2,
    pub mass: f32,
    /// Anchors never move
    pub fixed: bool,
}

impl PhysicsPoint {
    pub fn new(pos: Vec2, mass: f32, fixed: bool) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            external: Vec2::ZERO,
            // A massless point would divide by zero in every force term
            mass: if mass > 0.0 { mass } else { 1.0 },
            fixed,
        }
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// Damped spring between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub a: PointId,
    pub b: PointId,
    /// Separation at creation time
    pub rest_length: f32,
    pub stiffness: f32,
    /// Recorded per spring; the axis damping force uses the fixed
    /// `SPRING_DAMPING_COEFFICIENT`
    pub damping: f32,
}

/// Keeps two points near a target separation by positional correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceConstraint {
    pub a: PointId,
    pub b: PointId,
    pub target: f32,
    /// Fraction of the error corrected per step, 0..=1
    pub strength: f32,
}

/// Shift every index above `removed` down by one.
///
/// Returns `None` when `id` is the removed point itself.
#[inline]
pub(crate) fn renumber(id: PointId, removed: PointId) -> Option<PointId> {
    match id.cmp(&removed) {
        std::cmp::Ordering::Less => Some(id),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(id - 1),
    }
}
