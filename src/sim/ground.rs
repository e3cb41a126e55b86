//! Lanes and the ground beneath them
//!
//! The floor is split into 16 lanes. A bean that lands breaks its lane for
//! the rest of the round; pyoro cannot walk onto a broken lane.

use serde::{Deserialize, Serialize};

use crate::consts::{BEAN_SPAWN_X, LANE_BORDERS, LANE_COUNT};

/// Index of one of the 16 lanes. Always in `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    pub const COUNT: usize = LANE_COUNT;
    pub const FIRST: Lane = Lane(0);
    pub const LAST: Lane = Lane(LANE_COUNT as u8 - 1);

    /// Lane for a raw index, `None` when out of range
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Neighbour toward the left screen edge
    pub fn left(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// Neighbour toward the right screen edge
    pub fn right(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Left border (inclusive)
    pub fn left_border(self) -> i32 {
        LANE_BORDERS[self.index()]
    }

    /// Right border (exclusive)
    pub fn right_border(self) -> i32 {
        LANE_BORDERS[self.index() + 1]
    }

    /// Whether `x` lies inside this lane's border interval
    pub fn contains(self, x: i32) -> bool {
        (self.left_border()..self.right_border()).contains(&x)
    }

    /// Where a bean falling down this lane is drawn
    pub fn spawn_x(self) -> i32 {
        BEAN_SPAWN_X[self.index()]
    }

    pub fn all() -> impl Iterator<Item = Lane> {
        (0..LANE_COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("lane {index} out of range 0..{LANE_COUNT}"))
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> u8 {
        lane.0
    }
}

/// Per-lane floor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ground {
    solid: [bool; LANE_COUNT],
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            solid: [true; LANE_COUNT],
        }
    }
}

impl Ground {
    /// Restore every lane
    pub fn reset(&mut self) {
        self.solid = [true; LANE_COUNT];
    }

    pub fn is_solid(&self, lane: Lane) -> bool {
        self.solid[lane.index()]
    }

    /// Break a lane. Breaking an already broken lane is a no-op.
    pub fn break_lane(&mut self, lane: Lane) {
        self.solid[lane.index()] = false;
    }

    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|s| **s).count()
    }

    /// Lane states from left to right
    pub fn lanes(&self) -> impl Iterator<Item = (Lane, bool)> + '_ {
        Lane::all().zip(self.solid.iter().copied())
    }
}
