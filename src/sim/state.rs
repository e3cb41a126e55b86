//! Round state and core simulation types
//!
//! Everything that belongs to one round lives in `RoundState`. A new round
//! resets it in place; only the walking and falling speeds carry over.

use serde::{Deserialize, Serialize};

use super::bean::Bean;
use super::ground::{Ground, Lane};
use super::pyoro::{Facing, Pyoro};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Active gameplay
    #[default]
    Running,
    /// A bean reached pyoro's lane. Terminal for the round.
    GameOver,
}

/// Something that happened during a tick. The round loop hands each one
/// to the renderer through `Renderer::on_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BeanSpawned { lane: Lane },
    ShotFired { facing: Facing },
    BeanShot { lane: Lane },
    BeanLanded { lane: Lane },
    LaneBlocked { at: Lane, toward: Lane },
    PlayerDied { lane: Lane },
}

/// Round statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    /// Simulation ticks played
    pub ticks: u64,
    pub beans_shot: u32,
    pub beans_landed: u32,
}

/// Complete round state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub ground: Ground,
    pub pyoro: Pyoro,
    pub bean: Bean,
    pub stats: RoundStats,
    /// Whether pyoro fired this tick (drawn as the shot line)
    #[serde(skip)]
    pub fired: bool,
    /// Events raised by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl RoundState {
    /// A fresh round with the given walking and falling speeds. The first
    /// bean is dropped in `first_lane`.
    pub fn new(pyoro_speed: i32, bean_speed: i32, first_lane: Lane) -> Self {
        let mut state = Self {
            pyoro: Pyoro::new(pyoro_speed),
            bean: Bean::new(bean_speed),
            ..Default::default()
        };
        state.spawn_bean(first_lane);
        state
    }

    /// Start the next round in place: ground restored, pyoro back at the
    /// start, stats cleared and the first bean dropped in `first_lane`.
    /// Walking and falling speeds carry over.
    pub fn reset(&mut self, first_lane: Lane) {
        self.phase = RoundPhase::Running;
        self.ground.reset();
        self.pyoro = Pyoro::new(self.pyoro.speed);
        self.bean = Bean::new(self.bean.speed);
        self.stats = RoundStats::default();
        self.fired = false;
        self.events.clear();
        self.spawn_bean(first_lane);
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    /// Drop a new bean
    pub fn spawn_bean(&mut self, lane: Lane) {
        self.bean.spawn(lane);
        self.events.push(GameEvent::BeanSpawned { lane });
    }

    /// Whether the bean is low enough in pyoro's lane to end the round.
    /// Does not look at whether the bean is still falling: a bean that
    /// landed this tick still counts.
    pub fn pyoro_crushed(&self) -> bool {
        self.bean.in_death_zone() && self.bean.lane == self.pyoro.lane
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
