//! Platform abstraction layer
//!
//! The simulation never talks to hardware. Everything it needs from the
//! outside world goes through these capabilities:
//! - `Renderer`: vector drawing and text
//! - `Input`: joystick and fire button
//! - `FrameClock`: the once-per-frame wait
//! - `LaneSource` (in `sim`): random bean lanes, backed by `Pcg32`

pub mod terminal;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::sim::{Direction, Facing, GameEvent, Ground, Lane, LaneSource};

/// Errors raised by a platform backend
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Draws one frame. Calls are fire-and-forget; a backend presents the
/// frame when the clock advances.
pub trait Renderer {
    fn draw_player(&mut self, pos: IVec2, facing: Facing);
    fn draw_bean(&mut self, pos: IVec2);
    fn draw_ground(&mut self, ground: &Ground);
    /// Shot line leaving pyoro diagonally upward
    fn draw_shot(&mut self, from: IVec2, facing: Facing);
    /// Text with its left end at `pos`
    fn show_message(&mut self, text: &str, pos: IVec2);
    /// Something happened this tick. Drawn before the frame's shapes.
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Controller state for the current frame
pub trait Input {
    fn poll_direction(&mut self) -> Direction;
    fn poll_fire(&mut self) -> bool;
    /// Player asked to leave the game
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Frame pacing. `wait_next_frame` is the only place the game blocks.
pub trait FrameClock {
    fn wait_next_frame(&mut self) -> Result<(), PlatformError>;
}

/// A complete backend
pub trait Platform: Renderer + Input + FrameClock {}

impl<T: Renderer + Input + FrameClock> Platform for T {}

impl LaneSource for Pcg32 {
    fn random_lane(&mut self) -> Lane {
        let index = self.random_range(0..Lane::COUNT as u8);
        Lane::new(index).unwrap_or(Lane::FIRST)
    }
}
