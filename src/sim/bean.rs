//! The falling bean
//!
//! Only one bean is on screen at a time. It spawns at the top of a random
//! lane, falls a fixed distance each tick and either lands (breaking the
//! lane beneath it) or gets shot.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::ground::{Ground, Lane};
use crate::consts::*;

/// Bean lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeanState {
    /// Nothing on screen, waiting for the next spawn
    #[default]
    Inactive,
    /// Falling down its lane
    Falling,
}

/// The falling hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bean {
    pub pos: IVec2,
    pub lane: Lane,
    /// Fall distance per tick
    pub speed: i32,
    pub state: BeanState,
}

impl Default for Bean {
    fn default() -> Self {
        Self::new(BEAN_FALL_SPEED)
    }
}

impl Bean {
    /// An inactive bean with the given fall speed
    pub fn new(speed: i32) -> Self {
        Self {
            pos: IVec2::ZERO,
            lane: Lane::FIRST,
            speed,
            state: BeanState::Inactive,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.state == BeanState::Falling
    }

    /// Drop a new bean at the top of `lane`
    pub fn spawn(&mut self, lane: Lane) {
        debug_assert!(!self.is_falling(), "spawned over a falling bean");
        self.lane = lane;
        self.pos = IVec2::new(lane.spawn_x(), BEAN_SPAWN_Y);
        self.state = BeanState::Falling;
    }

    /// Fall one tick
    pub fn advance(&mut self) {
        if self.is_falling() {
            self.pos.y -= self.speed;
        }
    }

    /// Land the bean if it reached the ground. Breaks its lane and returns
    /// true on landing.
    pub fn check_ground(&mut self, ground: &mut Ground) -> bool {
        if !self.is_falling() || self.pos.y >= BEAN_LAND_Y {
            return false;
        }
        ground.break_lane(self.lane);
        self.state = BeanState::Inactive;
        true
    }

    /// Knock the bean out of the air. Returns true if it was falling.
    /// The ground is untouched.
    pub fn hit(&mut self) -> bool {
        if !self.is_falling() {
            return false;
        }
        self.state = BeanState::Inactive;
        true
    }

    /// Low enough to crush a pyoro standing in its lane
    pub fn in_death_zone(&self) -> bool {
        self.pos.y < BEAN_DEATH_Y
    }
}
