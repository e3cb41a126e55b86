//! Shot resolution
//!
//! Pyoro's tongue shoots diagonally up in the direction it faces. Rather
//! than tracing the line, the hit test compares the halved horizontal
//! distance to a window derived from the bean's height: the lower the
//! bean, the closer it must be. Coordinates are halved with `>> 1` to match
//! the console's scale, and the two facings are mirror images.

use glam::IVec2;

use super::pyoro::Facing;
use crate::consts::{SHOT_REACH, SHOT_WINDOW};
use crate::half;

/// Result of a shot test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotResult {
    /// Whether the bean was hit
    pub hit: bool,
    /// Halved horizontal distance toward the facing side (negative = behind)
    pub reach: i32,
    /// Lower bound of the hit window (exclusive)
    pub window_start: i32,
}

impl ShotResult {
    pub fn miss(reach: i32, window_start: i32) -> Self {
        Self {
            hit: false,
            reach,
            window_start,
        }
    }
}

/// Test a shot from `shooter_x` facing `facing` against a bean at `bean`.
pub fn resolve_shot(shooter_x: i32, facing: Facing, bean: IVec2) -> ShotResult {
    let dx = half(bean.x) - half(shooter_x);
    let reach = match facing {
        Facing::Right => dx,
        Facing::Left => -dx,
    };
    let window_start = half(bean.y) + SHOT_REACH;

    if reach <= 0 {
        return ShotResult::miss(reach, window_start);
    }

    ShotResult {
        hit: reach > window_start && reach < window_start + SHOT_WINDOW,
        reach,
        window_start,
    }
}
