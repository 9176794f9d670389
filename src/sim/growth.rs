//! Stroke-seeded branch growth
//!
//! Each frame the engine:
//! 1. Advances unfinished branches by one throttled growth tick.
//! 2. Lets finished branches fork into 1-2 children, at most once per cooldown.
//! 3. Pulses the opacity of finished branches.
//!
//! Randomness comes from an injected generator so a fixed seed replays the
//! same forest. The live population never exceeds [`MAX_BRANCHES`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::branch::Branch;
use super::mode::GrowthMode;
use crate::color::{Color, branch_color};
use crate::consts::*;
use crate::normalize_angle;
use crate::settings::GrowthSettings;

/// Parameters for a branch that has not started growing yet
struct Sprout {
    start: Vec2,
    angle: f32,
    length: f32,
    generation: u32,
    opacity: f32,
    root_color: Color,
    mode: GrowthMode,
}

impl Sprout {
    /// Draw the random growth budget and onset delay
    fn into_branch<R: Rng>(self, rng: &mut R, now: f64) -> Branch {
        Branch {
            start: self.start,
            angle: normalize_angle(self.angle),
            length: self.length,
            generation: self.generation,
            progress: 0.0,
            max_progress: rng.random_range(MAX_PROGRESS_RANGE),
            color: branch_color(self.root_color, self.generation, self.mode),
            root_color: self.root_color,
            opacity: self.opacity,
            pulse: 0.0,
            last_growth_time: now + rng.random_range(ONSET_JITTER_MS),
            mode: self.mode,
            pulse_phase: rng.random_range(0.0..std::f32::consts::TAU),
        }
    }
}

/// Owns every live branch
#[derive(Debug, Clone)]
pub struct GrowthEngine<R: Rng = Pcg32> {
    branches: Vec<Branch>,
    rng: R,
}

impl GrowthEngine<Pcg32> {
    /// Reproducible engine
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    /// Engine seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self::with_rng(Pcg32::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> GrowthEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            branches: Vec::new(),
            rng,
        }
    }

    /// Branches in creation order
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.branches.iter().filter(|b| b.is_complete()).count()
    }

    /// Drop every branch
    pub fn clear(&mut self) {
        log::info!("Clearing {} branches", self.branches.len());
        self.branches.clear();
    }

    /// Seed generation-0 branches along a finished stroke.
    ///
    /// Samples are spread evenly over the stroke's point indices; each one
    /// sprouts the mode's number of branches heading roughly along the local
    /// tangent. Returns how many branches were added, which is 0 for strokes
    /// shorter than two points or when the population is already capped.
    pub fn seed_from_stroke(
        &mut self,
        points: &[Vec2],
        settings: &GrowthSettings,
        now: f64,
    ) -> usize {
        let n = points.len();
        if n < 2 {
            log::debug!("Stroke of {} point(s) is too short to seed", n);
            return 0;
        }

        let mode = settings.drawing_mode;
        let profile = mode.profile();
        let complexity = settings.branch_complexity.max(0.0) / 100.0;
        // More samples than points revisit points; the index stays in range
        let samples = ((n as f32 * complexity * profile.density).floor() as usize).max(1);

        let before = self.branches.len();
        'samples: for k in 0..samples {
            let idx = k * n / samples;
            let origin = points[idx];
            let tangent = points
                .get(idx + 1)
                .map(|next| *next - origin)
                .unwrap_or(Vec2::ZERO);
            let heading = tangent.y.atan2(tangent.x);

            for _ in 0..profile.branches_per_sample {
                if self.branches.len() >= MAX_BRANCHES {
                    break 'samples;
                }
                let jitter = self.rng.random_range(-0.5f32..=0.5) * profile.angular_spread;
                let length = self.rng.random_range(SEED_LENGTH_RANGE) * profile.length_multiplier;
                let sprout = Sprout {
                    start: origin,
                    angle: heading + jitter,
                    length,
                    generation: 0,
                    opacity: 1.0,
                    root_color: settings.selected_color,
                    mode,
                };
                let branch = sprout.into_branch(&mut self.rng, now);
                self.branches.push(branch);
            }
        }

        let added = self.branches.len() - before;
        log::info!(
            "Seeded {} {} branches from {} samples ({} live)",
            added,
            mode.as_str(),
            samples,
            self.branches.len()
        );
        added
    }

    /// Advance every branch by one frame.
    ///
    /// `on_complete` receives the end point and color of each branch at the
    /// step where it first becomes fully grown.
    pub fn step(
        &mut self,
        now: f64,
        settings: &GrowthSettings,
        mut on_complete: Option<&mut dyn FnMut(Vec2, Color)>,
    ) {
        let speed = settings.growth_speed.max(0.0);
        let increment = speed / GROWTH_SPEED_DIVISOR;
        let spawn_scale = (speed / GROWTH_SPEED_DIVISOR) as f64;

        let Self { branches, rng } = self;
        let live = branches.len();
        let mut sprouts: Vec<Branch> = Vec::new();

        for branch in branches.iter_mut() {
            // Growth tick
            if !branch.is_complete() && now - branch.last_growth_time >= GROWTH_TICK_MS {
                branch.progress = (branch.progress + increment).min(branch.max_progress);
                branch.last_growth_time = now;
                if branch.is_complete()
                    && let Some(callback) = on_complete.as_deref_mut()
                {
                    callback(branch.end(), branch.color);
                }
            }

            if !branch.is_complete() {
                continue;
            }

            // Forking
            let profile = branch.mode.profile();
            let eligible = branch.generation < profile.max_generation
                && now - branch.last_growth_time >= profile.spawn_cooldown_ms
                && live + sprouts.len() < MAX_BRANCHES;
            if eligible {
                let chance = (profile.spawn_probability * spawn_scale).clamp(0.0, 1.0);
                if rng.random_bool(chance) {
                    branch.last_growth_time = now;
                    let count = rng.random_range(1..=2);
                    let generation = branch.generation + 1;
                    for _ in 0..count {
                        if live + sprouts.len() >= MAX_BRANCHES {
                            break;
                        }
                        let offset = profile.child_angle_offset;
                        let opacity = (branch.opacity
                            - OPACITY_DECAY_PER_GENERATION * generation as f32)
                            .max(MIN_CHILD_OPACITY);
                        let sprout = Sprout {
                            start: branch.end(),
                            angle: branch.angle + rng.random_range(-offset..=offset),
                            length: branch.length * rng.random_range(CHILD_LENGTH_FACTOR),
                            generation,
                            opacity,
                            root_color: branch.root_color,
                            mode: branch.mode,
                        };
                        sprouts.push(sprout.into_branch(&mut *rng, now));
                    }
                }
            }

            // Idle pulse
            let phase = (now * PULSE_RATE) as f32 + branch.pulse_phase;
            branch.pulse = PULSE_AMPLITUDE * phase.sin();
        }

        if !sprouts.is_empty() {
            log::debug!("Spawned {} child branches", sprouts.len());
            branches.append(&mut sprouts);
        }
    }
}
