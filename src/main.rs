//! Pyoro-chan entry point
//!
//! Loads settings, takes over the terminal and runs rounds until the player
//! quits. Logs go to stderr (`RUST_LOG=debug pyoro-chan 2>pyoro.log`).

use std::path::PathBuf;

use anyhow::Context;

use pyoro_chan::platform::terminal::Terminal;
use pyoro_chan::{Game, Settings};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Pyoro-chan starting...");

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref())
        .context("could not load settings")?;

    let terminal = Terminal::new(settings.frame_rate_hz).context("could not set up terminal")?;
    let mut game = Game::new(terminal, settings);
    game.run().context("terminal frontend failed")?;

    log::info!("Bye after {} rounds", game.rounds_played());
    Ok(())
}
