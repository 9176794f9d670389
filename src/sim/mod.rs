//! Frame-stepped simulation module
//!
//! Two independent engines, each stepped once per rendered frame:
//! - Growth: stroke-seeded branches that grow, fork and pulse
//! - Physics: point masses joined by springs and distance constraints
//!
//! Neither engine touches the other's data; coupling them is up to the caller.

pub mod body;
pub mod branch;
pub mod collision;
pub mod growth;
pub mod mode;
pub mod physics;

pub use body::{DistanceConstraint, PhysicsPoint, PointId, Spring};
pub use branch::Branch;
pub use collision::{PairGrid, resolve_overlaps};
pub use growth::GrowthEngine;
pub use mode::{GrowthMode, ModeProfile};
pub use physics::PhysicsEngine;
