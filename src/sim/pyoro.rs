//! Pyoro, the player
//!
//! Pyoro walks along the bottom of the screen. Its x position and lane are
//! kept in step: the lane only changes when x crosses a lane border, and
//! only if the lane being entered still has ground.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::bean::Bean;
use super::collision::resolve_shot;
use super::ground::{Ground, Lane};
use crate::consts::*;

/// Which way pyoro looks (and shoots)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Directional input for one tick. Left and right are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// What a movement step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// No directional input, or pushing against the screen edge
    Stayed,
    /// Moved within the current lane
    Walked,
    /// Moved across a border into the neighbouring lane
    Crossed { from: Lane, to: Lane },
    /// Stopped at a border because the next lane has no ground
    Blocked { at: Lane, toward: Lane },
}

impl Movement {
    /// Whether the step counts as walking (which rules out firing)
    pub fn moved(&self) -> bool {
        !matches!(self, Movement::Stayed)
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pyoro {
    pub pos: IVec2,
    pub lane: Lane,
    /// Walking distance per tick
    pub speed: i32,
    pub facing: Facing,
}

impl Default for Pyoro {
    fn default() -> Self {
        Self::new(PYORO_SPEED)
    }
}

impl Pyoro {
    /// Pyoro at the start position with the given walking speed
    pub fn new(speed: i32) -> Self {
        Self {
            pos: IVec2::new(PYORO_START_X, PYORO_START_Y),
            lane: Lane::new(PYORO_START_LANE).unwrap_or(Lane::FIRST),
            speed,
            facing: Facing::Right,
        }
    }

    /// Apply one tick of directional input
    pub fn step(&mut self, direction: Direction, ground: &Ground) -> Movement {
        let movement = match direction {
            Direction::Left if self.pos.x > LEFT_EDGE => self.walk_left(ground),
            Direction::Right if self.pos.x < RIGHT_EDGE => self.walk_right(ground),
            _ => Movement::Stayed,
        };
        debug_assert!(
            self.lane.contains(self.pos.x),
            "x {} outside lane {:?}",
            self.pos.x,
            self.lane
        );
        movement
    }

    fn walk_left(&mut self, ground: &Ground) -> Movement {
        self.facing = Facing::Left;
        self.pos.x = (self.pos.x - self.speed).max(LEFT_EDGE);

        if self.pos.x >= self.lane.left_border() {
            return Movement::Walked;
        }

        match self.lane.left() {
            Some(next) if ground.is_solid(next) => {
                let from = self.lane;
                self.lane = next;
                Movement::Crossed { from, to: next }
            }
            next => {
                self.pos.x = self.lane.left_border();
                Movement::Blocked {
                    at: self.lane,
                    toward: next.unwrap_or(self.lane),
                }
            }
        }
    }

    fn walk_right(&mut self, ground: &Ground) -> Movement {
        self.facing = Facing::Right;
        self.pos.x = (self.pos.x + self.speed).min(RIGHT_EDGE);

        if self.pos.x < self.lane.right_border() {
            return Movement::Walked;
        }

        match self.lane.right() {
            Some(next) if ground.is_solid(next) => {
                let from = self.lane;
                self.lane = next;
                Movement::Crossed { from, to: next }
            }
            next => {
                self.pos.x = self.lane.right_border() - 1;
                Movement::Blocked {
                    at: self.lane,
                    toward: next.unwrap_or(self.lane),
                }
            }
        }
    }

    /// Shoot at the bean. Knocks it out and returns true on a hit; shooting
    /// with no bean in the air does nothing.
    pub fn fire(&self, bean: &mut Bean) -> bool {
        if !bean.is_falling() {
            return false;
        }
        resolve_shot(self.pos.x, self.facing, bean.pos).hit && bean.hit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pyoro_at(lane: u8, x: i32) -> Pyoro {
        let mut pyoro = Pyoro::default();
        pyoro.lane = Lane::new(lane).unwrap();
        pyoro.pos.x = x;
        pyoro
    }

    #[test]
    fn test_start_position() {
        let pyoro = Pyoro::default();
        assert_eq!(pyoro.pos, IVec2::new(0, -120));
        assert_eq!(pyoro.lane.index(), 8);
        assert_eq!(pyoro.facing, Facing::Right);
        assert_eq!(pyoro.speed, 3);
    }

    #[test]
    fn test_walk_within_lane() {
        let ground = Ground::default();
        let mut pyoro = Pyoro::default();
        assert_eq!(pyoro.step(Direction::Right, &ground), Movement::Walked);
        assert_eq!(pyoro.pos.x, 3);
        assert_eq!(pyoro.step(Direction::Left, &ground), Movement::Walked);
        assert_eq!(pyoro.pos.x, 0);
        assert_eq!(pyoro.facing, Facing::Left);
    }

    #[test]
    fn test_no_input_stays() {
        let ground = Ground::default();
        let mut pyoro = Pyoro::default();
        assert_eq!(pyoro.step(Direction::None, &ground), Movement::Stayed);
        assert_eq!(pyoro.pos.x, 0);
        assert!(!Movement::Stayed.moved());
    }

    #[test]
    fn test_cross_left_onto_solid_ground() {
        let ground = Ground::default();
        let mut pyoro = Pyoro::default();
        let movement = pyoro.step(Direction::Left, &ground);
        assert_eq!(pyoro.pos.x, -3);
        assert_eq!(
            movement,
            Movement::Crossed {
                from: Lane::new(8).unwrap(),
                to: Lane::new(7).unwrap()
            }
        );
        assert_eq!(pyoro.lane.index(), 7);
    }

    #[test]
    fn test_blocked_left_clamps_to_border() {
        let mut ground = Ground::default();
        for k in 1..Lane::COUNT as u8 {
            ground.reset();
            ground.break_lane(Lane::new(k - 1).unwrap());
            let lane = Lane::new(k).unwrap();
            let mut pyoro = pyoro_at(k, lane.left_border());
            let movement = pyoro.step(Direction::Left, &ground);
            assert!(movement.moved());
            assert!(matches!(movement, Movement::Blocked { .. }));
            assert_eq!(pyoro.lane, lane);
            assert_eq!(pyoro.pos.x, LANE_BORDERS[k as usize]);
        }
    }

    #[test]
    fn test_blocked_right_clamps_below_border() {
        let mut ground = Ground::default();
        ground.break_lane(Lane::new(9).unwrap());
        let mut pyoro = pyoro_at(8, 14);
        pyoro.step(Direction::Right, &ground);
        assert_eq!(pyoro.lane.index(), 8);
        assert_eq!(pyoro.pos.x, 15);
        // Keeps pushing without getting through
        pyoro.step(Direction::Right, &ground);
        assert_eq!(pyoro.pos.x, 15);
        assert_eq!(pyoro.lane.index(), 8);
    }

    #[test]
    fn test_walk_right_across_all_lanes() {
        let ground = Ground::default();
        let mut pyoro = Pyoro::default();
        for _ in 0..100 {
            pyoro.step(Direction::Right, &ground);
        }
        assert_eq!(pyoro.lane, Lane::LAST);
        assert_eq!(pyoro.pos.x, RIGHT_EDGE);
        // At the edge holding right is not a move
        assert_eq!(pyoro.step(Direction::Right, &ground), Movement::Stayed);
    }

    #[test]
    fn test_walk_left_to_edge() {
        let ground = Ground::default();
        let mut pyoro = Pyoro::default();
        for _ in 0..100 {
            pyoro.step(Direction::Left, &ground);
        }
        assert_eq!(pyoro.lane, Lane::FIRST);
        assert_eq!(pyoro.pos.x, LEFT_EDGE);
        assert_eq!(pyoro.step(Direction::Left, &ground), Movement::Stayed);
    }

    #[test]
    fn test_edge_clamp_does_not_overshoot() {
        let ground = Ground::default();
        let mut pyoro = pyoro_at(0, -119);
        assert_eq!(pyoro.step(Direction::Left, &ground), Movement::Walked);
        assert_eq!(pyoro.pos.x, LEFT_EDGE);
        assert_eq!(pyoro.lane, Lane::FIRST);
    }

    #[test]
    fn test_fire_hits_bean_in_window() {
        let pyoro = Pyoro::default();
        let mut bean = Bean::default();
        bean.spawn(Lane::new(11).unwrap());
        bean.pos.y = -60;
        bean.pos.x = 60;
        assert!(pyoro.fire(&mut bean));
        assert!(!bean.is_falling());
    }

    #[test]
    fn test_fire_without_bean_is_noop() {
        let pyoro = Pyoro::default();
        let mut bean = Bean::default();
        bean.pos = IVec2::new(60, -60);
        assert!(!pyoro.fire(&mut bean));
        assert_eq!(bean.pos, IVec2::new(60, -60));
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::None),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_x_stays_inside_lane(
            broken in proptest::collection::vec(0u8..16, 0..8),
            inputs in proptest::collection::vec(direction(), 0..300),
        ) {
            let mut ground = Ground::default();
            for lane in broken {
                let lane = Lane::new(lane).unwrap();
                if lane.index() != PYORO_START_LANE as usize {
                    ground.break_lane(lane);
                }
            }
            let mut pyoro = Pyoro::default();
            for input in inputs {
                pyoro.step(input, &ground);
                prop_assert!(pyoro.lane.contains(pyoro.pos.x));
                prop_assert!(ground.is_solid(pyoro.lane));
                prop_assert!((LEFT_EDGE..=RIGHT_EDGE).contains(&pyoro.pos.x));
            }
        }
    }
}
