//! Mass-spring-damper physics
//!
//! One [`PhysicsEngine::step`] runs a fixed sequence:
//! 1. Reset accelerations (queued external forces land here).
//! 2. Gravity on free points.
//! 3. Wind drag pulling velocity toward the wind vector.
//! 4. Spring and spring-damping forces.
//! 5. Overlap resolution (positional).
//! 6. Distance constraints (positional).
//! 7. Semi-implicit Euler integration, air resistance and wall bounces.
//!
//! The order is part of the behavior: forces are summed before the single
//! integration pass, and both positional passes run in between.

use glam::Vec2;

use super::body::{DistanceConstraint, PhysicsPoint, PointId, Spring, renumber};
use super::collision::{PairGrid, resolve_overlaps};
use crate::consts::*;
use crate::settings::PhysicsSettings;

/// Owns the point arena and everything that references it
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    points: Vec<PhysicsPoint>,
    springs: Vec<Spring>,
    constraints: Vec<DistanceConstraint>,
    gravity: f32,
    wind: Vec2,
    canvas: Vec2,
    margin: f32,
    grid: PairGrid,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self::with_canvas(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }

    pub fn with_canvas(width: f32, height: f32) -> Self {
        Self {
            points: Vec::new(),
            springs: Vec::new(),
            constraints: Vec::new(),
            gravity: 0.0,
            wind: Vec2::ZERO,
            canvas: Vec2::new(width, height),
            margin: DEFAULT_MARGIN,
            grid: PairGrid::default(),
        }
    }

    /// Engine configured from persisted settings
    pub fn from_settings(settings: &PhysicsSettings) -> Self {
        let mut engine = Self::with_canvas(settings.canvas_width, settings.canvas_height);
        engine.apply_settings(settings);
        engine
    }

    pub fn apply_settings(&mut self, settings: &PhysicsSettings) {
        self.set_canvas_size(settings.canvas_width, settings.canvas_height);
        self.set_margin(settings.margin);
        self.set_gravity(settings.gravity);
        self.set_wind(settings.wind);
    }

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    pub fn set_margin(&mut self, margin: f32) {
        self.margin = margin.max(0.0);
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn set_wind(&mut self, wind: Vec2) {
        self.wind = wind;
    }

    pub fn wind(&self) -> Vec2 {
        self.wind
    }

    pub fn points(&self) -> &[PhysicsPoint] {
        &self.points
    }

    pub fn point(&self, id: PointId) -> Option<&PhysicsPoint> {
        self.points.get(id)
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total kinetic energy of free points
    pub fn kinetic_energy(&self) -> f32 {
        self.points
            .iter()
            .filter(|p| !p.fixed)
            .map(PhysicsPoint::kinetic_energy)
            .sum()
    }

    /// Drop every point, spring and constraint
    pub fn clear(&mut self) {
        log::info!(
            "Clearing physics ({} points, {} springs, {} constraints)",
            self.points.len(),
            self.springs.len(),
            self.constraints.len()
        );
        self.points.clear();
        self.springs.clear();
        self.constraints.clear();
    }

    pub fn add_point(&mut self, pos: Vec2, mass: f32, fixed: bool) -> PointId {
        let id = self.points.len();
        self.points.push(PhysicsPoint::new(pos, mass, fixed));
        id
    }

    /// Connect two points; rest length is their current separation.
    /// Unknown indices are ignored.
    pub fn add_spring(&mut self, a: PointId, b: PointId, stiffness: f32, damping: f32) {
        let (Some(pa), Some(pb)) = (self.points.get(a), self.points.get(b)) else {
            log::debug!("Ignoring spring {}-{}: index out of range", a, b);
            return;
        };
        let rest_length = pa.pos.distance(pb.pos);
        self.springs.push(Spring {
            a,
            b,
            rest_length,
            stiffness,
            damping,
        });
    }

    /// Unknown indices are ignored
    pub fn add_distance_constraint(&mut self, a: PointId, b: PointId, distance: f32, strength: f32) {
        if a >= self.points.len() || b >= self.points.len() {
            log::debug!("Ignoring constraint {}-{}: index out of range", a, b);
            return;
        }
        self.constraints.push(DistanceConstraint {
            a,
            b,
            target: distance,
            strength: strength.clamp(0.0, 1.0),
        });
    }

    /// Add a rooted chain: the first point is fixed, neighbours are sprung
    /// with default stiffness and damping. Returns the new point ids.
    pub fn create_chain(&mut self, positions: &[Vec2], mass: f32) -> Vec<PointId> {
        let ids: Vec<PointId> = positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| self.add_point(pos, mass, i == 0))
            .collect();
        for pair in ids.windows(2) {
            self.add_spring(pair[0], pair[1], DEFAULT_STIFFNESS, DEFAULT_DAMPING);
        }
        log::debug!("Created chain of {} points", ids.len());
        ids
    }

    /// Remove a point along with every spring and constraint touching it;
    /// higher indices shift down by one.
    pub fn remove_point(&mut self, id: PointId) {
        if id >= self.points.len() {
            return;
        }
        self.points.remove(id);
        self.springs.retain_mut(|s| match (renumber(s.a, id), renumber(s.b, id)) {
            (Some(a), Some(b)) => {
                s.a = a;
                s.b = b;
                true
            }
            _ => false,
        });
        self.constraints.retain_mut(|c| match (renumber(c.a, id), renumber(c.b, id)) {
            (Some(a), Some(b)) => {
                c.a = a;
                c.b = b;
                true
            }
            _ => false,
        });
    }

    /// Queue a force on a free point for the next step only
    pub fn apply_force(&mut self, id: PointId, force: Vec2) {
        if let Some(p) = self.points.get_mut(id)
            && !p.fixed
        {
            p.external += force;
        }
    }

    /// Ids of all points within `radius` of `pos`
    pub fn query_radius(&self, pos: Vec2, radius: f32) -> Vec<PointId> {
        let r2 = radius * radius;
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.pos.distance_squared(pos) <= r2)
            .map(|(id, _)| id)
            .collect()
    }

    /// Advance the simulation by `dt` (1.0 = one frame)
    pub fn step(&mut self, dt: f32) {
        // 1. Reset, picking up queued external forces
        for p in &mut self.points {
            p.acc = if p.fixed { Vec2::ZERO } else { p.external / p.mass };
            p.external = Vec2::ZERO;
        }

        // 2. Gravity
        if self.gravity > 0.0 {
            for p in self.points.iter_mut().filter(|p| !p.fixed) {
                p.acc.y += self.gravity * p.mass;
            }
        }

        // 3. Wind drag
        if self.wind != Vec2::ZERO {
            for p in self.points.iter_mut().filter(|p| !p.fixed) {
                p.acc += (self.wind - p.vel) * WIND_COEFFICIENT;
            }
        }

        // 4. Springs
        for spring in &self.springs {
            apply_spring(&mut self.points, spring);
        }

        // 5. Overlaps
        resolve_overlaps(&mut self.points, MIN_DISTANCE, &mut self.grid);

        // 6. Distance constraints
        for c in &self.constraints {
            apply_constraint(&mut self.points, c);
        }

        // 7. Integrate
        let lo = Vec2::splat(self.margin);
        let hi = (self.canvas - Vec2::splat(self.margin)).max(lo);
        for p in self.points.iter_mut().filter(|p| !p.fixed) {
            p.vel += p.acc * dt;
            p.vel *= AIR_RESISTANCE;
            p.pos += p.vel * dt;

            if p.pos.x < lo.x || p.pos.x > hi.x {
                p.pos.x = p.pos.x.clamp(lo.x, hi.x);
                p.vel.x *= BOUNCE_FACTOR;
            }
            if p.pos.y < lo.y || p.pos.y > hi.y {
                p.pos.y = p.pos.y.clamp(lo.y, hi.y);
                p.vel.y *= BOUNCE_FACTOR;
            }
        }
    }
}

/// Hooke force plus damping along the spring axis
fn apply_spring(points: &mut [PhysicsPoint], spring: &Spring) {
    let (Some(a), Some(b)) = (points.get(spring.a), points.get(spring.b)) else {
        return;
    };
    let delta = b.pos - a.pos;
    let length = delta.length();
    if length <= 0.0 {
        return;
    }
    let axis = delta / length;
    let stretch = (length - spring.rest_length) * spring.stiffness;
    let closing = (b.vel - a.vel).dot(axis) * SPRING_DAMPING_COEFFICIENT;
    let force = axis * (stretch + closing);

    let pa = &mut points[spring.a];
    if !pa.fixed {
        pa.acc += force / pa.mass;
    }
    let pb = &mut points[spring.b];
    if !pb.fixed {
        pb.acc -= force / pb.mass;
    }
}

/// Move both ends toward the target separation, half each
fn apply_constraint(points: &mut [PhysicsPoint], c: &DistanceConstraint) {
    let (Some(a), Some(b)) = (points.get(c.a), points.get(c.b)) else {
        return;
    };
    let delta = b.pos - a.pos;
    let length = delta.length();
    if length <= 0.0 {
        return;
    }
    let correction = delta * ((length - c.target) / length * c.strength * 0.5);
    if !points[c.a].fixed {
        points[c.a].pos += correction;
    }
    if !points[c.b].fixed {
        points[c.b].pos -= correction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spring_ignores_unknown_indices() {
        let mut engine = PhysicsEngine::new();
        let a = engine.add_point(Vec2::new(100.0, 100.0), 1.0, false);
        engine.add_spring(a, 5, DEFAULT_STIFFNESS, DEFAULT_DAMPING);
        engine.add_distance_constraint(9, a, 10.0, 0.5);
        assert!(engine.springs().is_empty());
        assert!(engine.constraints().is_empty());
    }

    #[test]
    fn spring_captures_rest_length() {
        let mut engine = PhysicsEngine::new();
        let a = engine.add_point(Vec2::new(100.0, 100.0), 1.0, false);
        let b = engine.add_point(Vec2::new(130.0, 140.0), 1.0, false);
        engine.add_spring(a, b, 0.2, 0.9);
        assert!((engine.springs()[0].rest_length - 50.0).abs() < 1e-4);
    }

    #[test]
    fn free_point_coasts_with_air_resistance_only() {
        let mut engine = PhysicsEngine::new();
        let id = engine.add_point(Vec2::new(400.0, 300.0), 1.0, false);
        engine.points[id].vel = Vec2::new(0.5, -0.25);

        let mut last_speed = engine.points[id].vel.length();
        for _ in 0..50 {
            engine.step(1.0);
            let speed = engine.points[id].vel.length();
            assert!(speed < last_speed);
            assert!((speed / last_speed - AIR_RESISTANCE).abs() < 1e-5);
            last_speed = speed;
        }
    }

    #[test]
    fn resting_point_never_moves() {
        let mut engine = PhysicsEngine::new();
        let id = engine.add_point(Vec2::new(250.0, 250.0), 1.0, false);
        for _ in 0..10 {
            engine.step(1.0);
        }
        assert_eq!(engine.points[id].pos, Vec2::new(250.0, 250.0));
        assert_eq!(engine.points[id].vel, Vec2::ZERO);
    }

    #[test]
    fn fixed_point_ignores_everything() {
        let mut engine = PhysicsEngine::new();
        engine.set_gravity(1.0);
        engine.set_wind(Vec2::new(3.0, 0.0));
        let id = engine.add_point(Vec2::new(200.0, 200.0), 1.0, true);
        engine.apply_force(id, Vec2::new(100.0, 100.0));
        for _ in 0..20 {
            engine.step(1.0);
        }
        assert_eq!(engine.points[id].pos, Vec2::new(200.0, 200.0));
        assert_eq!(engine.points[id].vel, Vec2::ZERO);
    }

    #[test]
    fn spring_damping_uses_fixed_coefficient() {
        let run = |damping: f32| {
            let mut engine = PhysicsEngine::new();
            let a = engine.add_point(Vec2::new(100.0, 100.0), 1.0, true);
            let b = engine.add_point(Vec2::new(120.0, 100.0), 1.0, false);
            engine.add_spring(a, b, DEFAULT_STIFFNESS, damping);
            engine.points[b].vel = Vec2::new(1.0, 0.0);
            engine.step(1.0);
            engine.points[b].vel
        };

        // At rest length only damping acts: -0.05 * 1.0, then air resistance
        let expected = (1.0 - SPRING_DAMPING_COEFFICIENT) * AIR_RESISTANCE;
        assert!((run(DEFAULT_DAMPING).x - expected).abs() < 1e-6);
        assert_eq!(run(DEFAULT_DAMPING), run(0.2));
    }

    #[test]
    fn hanging_spring_settles_below_anchor() {
        let mut engine = PhysicsEngine::new();
        engine.set_margin(0.0);
        let anchor = engine.add_point(Vec2::new(0.0, 0.0), 1.0, true);
        let bob = engine.add_point(Vec2::new(0.0, 10.0), 1.0, false);
        engine.add_spring(anchor, bob, DEFAULT_STIFFNESS, DEFAULT_DAMPING);
        engine.set_gravity(0.1);

        for _ in 0..100 {
            engine.step(1.0);
        }

        let p = &engine.points()[bob];
        // Gravity 0.1 against stiffness 0.1 stretches the spring by one unit
        assert!(p.pos.x.abs() < 1e-4);
        assert!(p.pos.y > 10.0);
        assert!((p.pos.y - 11.0).abs() < 0.5);
        assert!(p.vel.length() < 0.1);

        for _ in 0..400 {
            engine.step(1.0);
        }
        let p = &engine.points()[bob];
        assert!((p.pos.y - 11.0).abs() < 0.05);
        assert!(p.vel.length() < 1e-3);
    }

    #[test]
    fn close_pair_separates_symmetrically() {
        let mut engine = PhysicsEngine::new();
        let a = engine.add_point(Vec2::new(300.0, 300.0), 1.0, false);
        let b = engine.add_point(Vec2::new(305.0, 300.0), 1.0, false);
        engine.step(1.0);

        let pa = engine.points()[a].pos;
        let pb = engine.points()[b].pos;
        assert!((pa.x - 297.5).abs() < 1e-4);
        assert!((pb.x - 307.5).abs() < 1e-4);
        assert!((pb.distance(pa) - MIN_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn walls_clamp_and_bounce() {
        let mut engine = PhysicsEngine::with_canvas(200.0, 100.0);
        let id = engine.add_point(Vec2::new(185.0, 50.0), 1.0, false);
        engine.points[id].vel = Vec2::new(10.0, 0.0);
        engine.step(1.0);

        let p = &engine.points()[id];
        assert_eq!(p.pos.x, 190.0);
        assert!((p.vel.x - 10.0 * AIR_RESISTANCE * BOUNCE_FACTOR).abs() < 1e-4);
        assert!(p.vel.x < 0.0);
    }

    #[test]
    fn wind_drag_converges_to_wind_velocity() {
        let mut engine = PhysicsEngine::with_canvas(1.0e7, 1.0e7);
        let id = engine.add_point(Vec2::new(1000.0, 1000.0), 1.0, false);
        engine.set_wind(Vec2::new(2.0, 0.0));
        for _ in 0..300 {
            engine.step(1.0);
        }
        let v = engine.points()[id].vel;
        // Air resistance keeps it just under the wind speed
        assert!(v.x > 1.9 && v.x <= 2.0);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn applied_force_lasts_one_step() {
        let mut engine = PhysicsEngine::new();
        let id = engine.add_point(Vec2::new(300.0, 300.0), 2.0, false);
        engine.apply_force(id, Vec2::new(4.0, 0.0));
        engine.step(1.0);
        let v1 = engine.points()[id].vel.x;
        assert!((v1 - 2.0 * AIR_RESISTANCE).abs() < 1e-5);

        engine.step(1.0);
        let v2 = engine.points()[id].vel.x;
        assert!((v2 - v1 * AIR_RESISTANCE).abs() < 1e-5);
    }

    #[test]
    fn constraint_pulls_toward_target() {
        let mut engine = PhysicsEngine::new();
        let a = engine.add_point(Vec2::new(100.0, 100.0), 1.0, false);
        let b = engine.add_point(Vec2::new(160.0, 100.0), 1.0, false);
        engine.add_distance_constraint(a, b, 40.0, 0.5);
        engine.step(1.0);

        let d = engine.points()[b].pos.distance(engine.points()[a].pos);
        // Error 20, half corrected
        assert!((d - 50.0).abs() < 1e-3);
    }

    #[test]
    fn remove_point_drops_and_renumbers() {
        let mut engine = PhysicsEngine::new();
        let ids = engine.create_chain(
            &[
                Vec2::new(100.0, 100.0),
                Vec2::new(100.0, 130.0),
                Vec2::new(100.0, 160.0),
                Vec2::new(100.0, 190.0),
            ],
            1.0,
        );
        engine.add_distance_constraint(ids[0], ids[3], 90.0, 0.5);
        engine.add_distance_constraint(ids[2], ids[3], 30.0, 0.5);
        assert!(engine.points()[0].fixed);
        assert!(!engine.points()[1].fixed);
        assert_eq!(engine.springs().len(), 3);

        engine.remove_point(1);

        assert_eq!(engine.len(), 3);
        assert_eq!(engine.springs().len(), 1);
        assert_eq!((engine.springs()[0].a, engine.springs()[0].b), (1, 2));
        let pairs: Vec<(PointId, PointId)> =
            engine.constraints().iter().map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs, vec![(0, 2), (1, 2)]);

        // Out of range is a no-op
        engine.remove_point(42);
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn query_radius_scans_all_points() {
        let mut engine = PhysicsEngine::new();
        engine.add_point(Vec2::new(100.0, 100.0), 1.0, false);
        engine.add_point(Vec2::new(150.0, 100.0), 1.0, false);
        engine.add_point(Vec2::new(103.0, 104.0), 1.0, true);
        assert_eq!(engine.query_radius(Vec2::new(100.0, 100.0), 5.0), vec![0, 2]);
        assert!(engine.query_radius(Vec2::new(500.0, 500.0), 5.0).is_empty());
    }

    #[test]
    fn coincident_spring_ends_produce_no_nan() {
        let mut engine = PhysicsEngine::new();
        let a = engine.add_point(Vec2::new(200.0, 200.0), 1.0, false);
        let b = engine.add_point(Vec2::new(200.0, 200.0), 1.0, false);
        engine.add_spring(a, b, 0.5, 0.99);
        engine.add_distance_constraint(a, b, 10.0, 1.0);
        engine.step(1.0);
        assert!(engine.points().iter().all(|p| p.pos.is_finite() && p.vel.is_finite()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn points_stay_inside_margins(
            start in prop::collection::vec((-500.0f32..1500.0, -500.0f32..1500.0, -30.0f32..30.0, -30.0f32..30.0), 1..40),
            gravity in 0.0f32..2.0,
            wind in (-5.0f32..5.0, -5.0f32..5.0),
        ) {
            let mut engine = PhysicsEngine::new();
            engine.set_gravity(gravity);
            engine.set_wind(Vec2::new(wind.0, wind.1));
            for (x, y, vx, vy) in start {
                let id = engine.add_point(Vec2::new(x, y), 1.0, false);
                engine.points[id].vel = Vec2::new(vx, vy);
            }
            for i in 1..engine.len() {
                engine.add_spring(i - 1, i, DEFAULT_STIFFNESS, DEFAULT_DAMPING);
            }
            let lo = DEFAULT_MARGIN;
            for _ in 0..60 {
                engine.step(1.0);
                for p in engine.points() {
                    prop_assert!(p.pos.x >= lo && p.pos.x <= DEFAULT_CANVAS_WIDTH - lo);
                    prop_assert!(p.pos.y >= lo && p.pos.y <= DEFAULT_CANVAS_HEIGHT - lo);
                }
            }
        }
    }
}
