//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed order within a tick
//! - Lanes come from an injected `LaneSource` only
//! - No rendering or platform dependencies

pub mod bean;
pub mod collision;
pub mod ground;
pub mod pyoro;
pub mod state;
pub mod tick;

pub use bean::{Bean, BeanState};
pub use collision::{ShotResult, resolve_shot};
pub use ground::{Ground, Lane};
pub use pyoro::{Direction, Facing, Movement, Pyoro};
pub use state::{GameEvent, RoundPhase, RoundState, RoundStats};
pub use tick::{LaneSource, TickInput, tick};
