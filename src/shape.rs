//! Gesture recognition contract
//!
//! Classification itself is done elsewhere; this module only defines what a
//! classifier hands back and when a result is confident enough to trigger
//! an effect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closed set of recognizable shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Line,
    Triangle,
    Square,
    Spiral,
    Star,
    Wave,
    Unknown,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Square => "square",
            ShapeKind::Spiral => "spiral",
            ShapeKind::Star => "star",
            ShapeKind::Wave => "wave",
            ShapeKind::Unknown => "unknown",
        }
    }

    /// Minimum confidence before this shape triggers an effect.
    ///
    /// Shapes that are easy to produce by accident need more confidence.
    pub fn confidence_threshold(&self) -> f32 {
        match self {
            ShapeKind::Line => 0.85,
            ShapeKind::Circle => 0.7,
            ShapeKind::Wave => 0.7,
            ShapeKind::Square => 0.65,
            ShapeKind::Triangle => 0.65,
            ShapeKind::Spiral => 0.6,
            ShapeKind::Star => 0.6,
            ShapeKind::Unknown => f32::INFINITY,
        }
    }
}

/// A classifier verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub kind: ShapeKind,
    /// Always within 0..=1
    pub confidence: f32,
}

impl Recognition {
    pub fn new(kind: ShapeKind, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { kind, confidence }
    }

    pub fn triggers_effect(&self) -> bool {
        self.confidence > self.kind.confidence_threshold()
    }
}

/// Anything that can label a stroke
pub trait ShapeClassifier {
    fn classify(&self, points: &[Vec2]) -> Recognition;
}

impl<F> ShapeClassifier for F
where
    F: Fn(&[Vec2]) -> Recognition,
{
    fn classify(&self, points: &[Vec2]) -> Recognition {
        self(points)
    }
}

/// Mean of the stroke points, where shape effects are anchored
pub fn centroid(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<Vec2>() / points.len() as f32)
}
