//! Fixed-order simulation tick
//!
//! One tick per displayed frame. The order matters: the death check reads
//! the bean after it fell this tick, and a bean shot in the movement phase
//! is replaced in the bean phase of the same tick.

use super::ground::Lane;
use super::pyoro::{Direction, Movement};
use super::state::{GameEvent, RoundPhase, RoundState};

/// Source of bean lanes. Must be uniform over all 16 lanes.
pub trait LaneSource {
    fn random_lane(&mut self) -> Lane;
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Walk left, right or not at all
    pub direction: Direction,
    /// Fire button state
    pub fire: bool,
}

/// Advance the round by one tick
pub fn tick(state: &mut RoundState, input: &TickInput, lanes: &mut impl LaneSource) {
    if state.phase == RoundPhase::GameOver {
        return;
    }

    state.stats.ticks += 1;
    state.fired = false;

    // 1. Pyoro: walk, or fire when standing still
    let movement = state.pyoro.step(input.direction, &state.ground);
    if let Movement::Blocked { at, toward } = movement {
        log::debug!("pyoro blocked at lane {} (lane {} is broken)", at.index(), toward.index());
        state.events.push(GameEvent::LaneBlocked { at, toward });
    }
    if !movement.moved() && input.fire {
        state.fired = true;
        state.events.push(GameEvent::ShotFired {
            facing: state.pyoro.facing,
        });
        let lane = state.bean.lane;
        if state.pyoro.fire(&mut state.bean) {
            log::debug!("bean shot in lane {} at y={}", lane.index(), state.bean.pos.y);
            state.stats.beans_shot += 1;
            state.events.push(GameEvent::BeanShot { lane });
        }
    }

    // 2. Bean: fall and land, or respawn
    if state.bean.is_falling() {
        state.bean.advance();
        if state.bean.check_ground(&mut state.ground) {
            let lane = state.bean.lane;
            log::debug!(
                "bean landed in lane {}, {} lanes left",
                lane.index(),
                state.ground.solid_count()
            );
            state.stats.beans_landed += 1;
            state.events.push(GameEvent::BeanLanded { lane });
        }
    } else {
        state.spawn_bean(lanes.random_lane());
    }

    // 3. Rendering happens outside the simulation, from the state

    // 4. Death check
    if state.pyoro_crushed() {
        let lane = state.pyoro.lane;
        log::info!("pyoro crushed in lane {} after {} ticks", lane.index(), state.stats.ticks);
        state.phase = RoundPhase::GameOver;
        state.events.push(GameEvent::PlayerDied { lane });
    }
}
