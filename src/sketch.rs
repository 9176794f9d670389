//! A drawing session
//!
//! Owns one growth engine and one physics engine, steps both once per frame,
//! and queues events for the cosmetic effects layer. The effects layer pulls
//! them with [`Sketch::drain_events`]; nothing here renders.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::MIN_DISTANCE;
use crate::settings::Settings;
use crate::shape::{Recognition, ShapeKind, centroid};
use crate::sim::{GrowthEngine, PhysicsEngine, PointId};

/// Something the effects layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SketchEvent {
    /// A branch just finished growing
    Bloom { pos: Vec2, color: Color },
    /// The committed stroke was confidently recognized as a shape
    ShapeRecognized {
        kind: ShapeKind,
        confidence: f32,
        centroid: Vec2,
    },
}

pub struct Sketch {
    settings: Settings,
    growth: GrowthEngine,
    physics: PhysicsEngine,
    events: Vec<SketchEvent>,
    frames: u64,
}

impl Sketch {
    /// Reproducible session
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_growth(settings, GrowthEngine::new(seed))
    }

    /// Session with entropy-seeded growth
    pub fn from_entropy(settings: Settings) -> Self {
        Self::with_growth(settings, GrowthEngine::from_entropy())
    }

    fn with_growth(settings: Settings, growth: GrowthEngine) -> Self {
        let physics = PhysicsEngine::from_settings(&settings.physics);
        Self {
            settings,
            growth,
            physics,
            events: Vec::new(),
            frames: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings; physics knobs take effect on the next frame
    pub fn apply_settings(&mut self, settings: Settings) {
        self.physics.apply_settings(&settings.physics);
        self.settings = settings;
    }

    pub fn growth(&self) -> &GrowthEngine {
        &self.growth
    }

    pub fn physics(&self) -> &PhysicsEngine {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsEngine {
        &mut self.physics
    }

    /// Frames stepped since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Hand a finished stroke to the session.
    ///
    /// Seeds branches along it, optionally anchors a spring chain to it, and
    /// queues a shape event when `recognition` is confident enough. Returns
    /// the number of branches seeded.
    pub fn commit_stroke(
        &mut self,
        points: &[Vec2],
        now: f64,
        recognition: Option<Recognition>,
    ) -> usize {
        let seeded = self.growth.seed_from_stroke(points, &self.settings.growth, now);

        if self.settings.physics.anchor_strokes {
            let links = chain_links(points);
            if links.len() >= 2 {
                self.physics.create_chain(&links, self.settings.physics.chain_mass);
            }
        }

        if let Some(r) = recognition
            && self.settings.growth.particle_effects_enabled
            && r.triggers_effect()
            && let Some(center) = centroid(points)
        {
            log::debug!("Recognized {} ({:.2})", r.kind.as_str(), r.confidence);
            self.events.push(SketchEvent::ShapeRecognized {
                kind: r.kind,
                confidence: r.confidence,
                centroid: center,
            });
        }

        seeded
    }

    /// Step growth, then physics
    pub fn frame(&mut self, now: f64) {
        let effects = self.settings.growth.particle_effects_enabled;
        let events = &mut self.events;
        let mut bloom = |pos: Vec2, color: Color| {
            if effects {
                events.push(SketchEvent::Bloom { pos, color });
            }
        };
        self.growth.step(now, &self.settings.growth, Some(&mut bloom));
        self.physics.step(1.0);
        self.frames += 1;
    }

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<SketchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start over with an empty canvas
    pub fn clear(&mut self) {
        self.growth.clear();
        self.physics.clear();
        self.events.clear();
    }

    /// Nearest chain link to `pos` within `radius`, for dragging
    pub fn pick_point(&self, pos: Vec2, radius: f32) -> Option<PointId> {
        self.physics
            .query_radius(pos, radius)
            .into_iter()
            .filter_map(|id| Some((id, self.physics.point(id)?.pos.distance_squared(pos))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

/// Stroke points thinned so consecutive links start out of collision range
fn chain_links(points: &[Vec2]) -> Vec<Vec2> {
    let mut links: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points {
        match links.last() {
            Some(last) if last.distance(p) < MIN_DISTANCE => {}
            _ => links.push(p),
        }
    }
    links
}
