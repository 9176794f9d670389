//! Overlap resolution between physics points
//!
//! A single positional pass: every pair closer than the minimum distance is
//! pushed apart by half the overlap each, visiting pairs in (i, j) index
//! order with live positions. Dense clusters may need several steps to fully
//! separate since the pass does not iterate.

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use super::body::{PhysicsPoint, PointId};
use crate::consts::GRID_THRESHOLD;

/// Uniform grid broad phase for large point counts
///
/// Cells are `cell_size` wide, so any pair closer than `cell_size` lies in
/// the same or an adjacent cell.
#[derive(Debug, Default, Clone)]
pub struct PairGrid {
    cells: HashMap<IVec2, Vec<PointId>>,
    pairs: Vec<(PointId, PointId)>,
}

/// Cell coordinates are clamped here so the ±1 neighbour offsets stay in `i32`
const MAX_CELL: f32 = 1.0e9;

impl PairGrid {
    fn cell_of(pos: Vec2, cell_size: f32) -> IVec2 {
        (pos / cell_size)
            .floor()
            .clamp(Vec2::splat(-MAX_CELL), Vec2::splat(MAX_CELL))
            .as_ivec2()
    }

    /// Rebuild from current positions and return candidate pairs sorted by (i, j)
    pub fn candidate_pairs(&mut self, points: &[PhysicsPoint], cell_size: f32) -> &[(PointId, PointId)] {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.pairs.clear();

        for (id, p) in points.iter().enumerate() {
            self.cells
                .entry(Self::cell_of(p.pos, cell_size))
                .or_default()
                .push(id);
        }

        for (i, p) in points.iter().enumerate() {
            let home = Self::cell_of(p.pos, cell_size);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(bucket) = self.cells.get(&(home + IVec2::new(dx, dy))) {
                        self.pairs
                            .extend(bucket.iter().filter(|&&j| j > i).map(|&j| (i, j)));
                    }
                }
            }
        }

        self.pairs.sort_unstable();
        &self.pairs
    }
}

/// Push `i` and `j` apart if they overlap. Returns whether a correction happened.
fn separate(points: &mut [PhysicsPoint], i: PointId, j: PointId, min_distance: f32) -> bool {
    let delta = points[j].pos - points[i].pos;
    let dist = delta.length();
    // Coincident points have no separation axis
    if dist >= min_distance || dist <= 0.0 {
        return false;
    }
    let push = delta / dist * ((min_distance - dist) * 0.5);
    if !points[i].fixed {
        points[i].pos -= push;
    }
    if !points[j].fixed {
        points[j].pos += push;
    }
    true
}

/// Resolve overlaps once. Returns the number of corrected pairs.
pub fn resolve_overlaps(points: &mut [PhysicsPoint], min_distance: f32, grid: &mut PairGrid) -> usize {
    let mut corrected = 0;
    if points.len() > GRID_THRESHOLD {
        let pairs = grid.candidate_pairs(points, min_distance);
        for &(i, j) in pairs {
            if separate(points, i, j, min_distance) {
                corrected += 1;
            }
        }
    } else {
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if separate(points, i, j, min_distance) {
                    corrected += 1;
                }
            }
        }
    }
    corrected
}
