//! Round loop
//!
//! Drives rounds on a platform: wait for the frame, read the controller,
//! tick, draw. When pyoro is crushed the game over screen is shown and a
//! fresh round starts.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::platform::{Platform, PlatformError, Renderer};
use crate::settings::Settings;
use crate::sim::{LaneSource, RoundState, RoundStats, TickInput, tick};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Pyoro was crushed
    GameOver(RoundStats),
    /// The player quit mid-round
    Quit,
}

/// Game instance: one platform, one RNG, the current round
pub struct Game<P: Platform, R: LaneSource = Pcg32> {
    platform: P,
    lanes: R,
    settings: Settings,
    state: RoundState,
    rounds_played: u32,
}

impl<P: Platform> Game<P, Pcg32> {
    /// A game with bean lanes drawn from a PCG seeded by the settings
    pub fn new(platform: P, settings: Settings) -> Self {
        let seed = settings.effective_seed();
        log::info!("Seeding bean lanes with {seed}");
        Self::with_lanes(platform, Pcg32::seed_from_u64(seed), settings)
    }
}

impl<P: Platform, R: LaneSource> Game<P, R> {
    pub fn with_lanes(platform: P, mut lanes: R, settings: Settings) -> Self {
        let state = Self::new_round(&settings, &mut lanes);
        Self {
            platform,
            lanes,
            settings,
            state,
            rounds_played: 0,
        }
    }

    fn new_round(settings: &Settings, lanes: &mut R) -> RoundState {
        RoundState::new(
            settings.player_speed,
            settings.bean_fall_speed,
            lanes.random_lane(),
        )
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Play rounds until the player quits
    pub fn run(&mut self) -> Result<(), PlatformError> {
        loop {
            match self.run_round()? {
                RoundOutcome::Quit => return Ok(()),
                RoundOutcome::GameOver(_) => {
                    if !self.game_over_screen()? {
                        return Ok(());
                    }
                    self.restart();
                }
            }
        }
    }

    /// Play the current round to its end
    pub fn run_round(&mut self) -> Result<RoundOutcome, PlatformError> {
        log::info!("Round {} starting", self.rounds_played + 1);

        while !self.state.is_over() {
            self.platform.wait_next_frame()?;
            if self.platform.quit_requested() {
                log::info!("Quit during round {}", self.rounds_played + 1);
                return Ok(RoundOutcome::Quit);
            }

            let input = TickInput {
                direction: self.platform.poll_direction(),
                fire: self.platform.poll_fire(),
            };
            tick(&mut self.state, &input, &mut self.lanes);
            for event in self.state.take_events() {
                log::trace!("{event:?}");
                self.platform.on_event(&event);
            }
            render(&self.state, &mut self.platform);
        }

        self.rounds_played += 1;
        let stats = self.state.stats;
        log::info!(
            "Game over after {} ticks: {} beans shot, {} landed",
            stats.ticks,
            stats.beans_shot,
            stats.beans_landed
        );
        match serde_json::to_string(&self.state) {
            Ok(json) => log::debug!("Final round state: {json}"),
            Err(err) => log::warn!("Could not dump round state: {err}"),
        }
        Ok(RoundOutcome::GameOver(stats))
    }

    /// Show the game over message for the configured number of frames.
    /// Returns false if the player quit meanwhile.
    pub fn game_over_screen(&mut self) -> Result<bool, PlatformError> {
        let pos = IVec2::new(GAME_OVER_TEXT_X, GAME_OVER_TEXT_Y);
        for _ in 0..self.settings.game_over_frames {
            self.platform.wait_next_frame()?;
            if self.platform.quit_requested() {
                return Ok(false);
            }
            self.platform.show_message("GAME OVER", pos);
        }
        Ok(true)
    }

    /// Reset the finished round for a new one
    pub fn restart(&mut self) {
        self.state.reset(self.lanes.random_lane());
    }
}

/// Draw the round as it stands after a tick
pub fn render(state: &RoundState, renderer: &mut impl Renderer) {
    let pyoro = &state.pyoro;
    if state.fired {
        renderer.draw_shot(pyoro.pos, pyoro.facing);
    }
    if state.bean.is_falling() {
        renderer.draw_bean(state.bean.pos);
    }
    renderer.draw_player(pyoro.pos, pyoro.facing);
    renderer.draw_ground(&state.ground);
}
