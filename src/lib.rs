//! Pyoro-chan - A single-screen lane shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ground, bean, pyoro, shot test, tick)
//! - `platform`: Renderer/input/RNG/clock capabilities and the terminal frontend
//! - `game`: Round loop wiring the simulation to a platform
//! - `settings`: JSON configuration

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::{Game, RoundOutcome};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
///
/// Screen units are the console's vector grid, roughly [-128, 127] on both
/// axes with y pointing up.
pub mod consts {
    /// Number of ground lanes
    pub const LANE_COUNT: usize = 16;

    /// Left lane borders plus the closing right border.
    /// Lane `i` spans `[LANE_BORDERS[i], LANE_BORDERS[i + 1])`.
    /// Lanes 0 and 15 are half width; the last entry is 120 + 1.
    pub const LANE_BORDERS: [i32; LANE_COUNT + 1] = [
        -120, -112, -96, -80, -64, -48, -32, -16, 0, 16, 32, 48, 64, 80, 96, 112, 121,
    ];

    /// Bean spawn x per lane
    pub const BEAN_SPAWN_X: [i32; LANE_COUNT] = [
        -120, -104, -88, -72, -56, -40, -24, -8, 8, 24, 40, 56, 72, 88, 104, 120,
    ];

    /// Player walking limits
    pub const LEFT_EDGE: i32 = -120;
    pub const RIGHT_EDGE: i32 = 120;

    /// Player defaults
    pub const PYORO_START_X: i32 = 0;
    pub const PYORO_START_Y: i32 = -120;
    pub const PYORO_START_LANE: u8 = 8;
    pub const PYORO_SPEED: i32 = 3;

    /// Bean defaults
    pub const BEAN_SPAWN_Y: i32 = 120;
    pub const BEAN_FALL_SPEED: i32 = 2;
    /// Bean breaks the ground below this height
    pub const BEAN_LAND_Y: i32 = -110;
    /// Bean kills a pyoro sharing its lane below this height
    pub const BEAN_DEATH_Y: i32 = -90;

    /// Shot window: vertical compensation and window width
    pub const SHOT_REACH: i32 = 55;
    pub const SHOT_WINDOW: i32 = 10;

    /// Console refresh rate
    pub const FRAME_RATE_HZ: u32 = 50;
    /// Game over screen duration. The cartridge counts a pre-decremented
    /// 150 down to zero, which shows the message for 149 frames.
    pub const GAME_OVER_FRAMES: u32 = 149;
    /// Game over message position (y, x)
    pub const GAME_OVER_TEXT_Y: i32 = 0;
    pub const GAME_OVER_TEXT_X: i32 = -70;
}

/// Halve a screen coordinate the way the hardware does (`>> 1`).
///
/// Arithmetic shift, so negative values round toward negative infinity:
/// `half(-1) == -1`, not 0.
#[inline]
pub fn half(v: i32) -> i32 {
    v >> 1
}
