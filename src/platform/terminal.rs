//! Terminal backend
//!
//! Draws the vector screen into a character grid with crossterm. The grid
//! keeps the console's coordinates: x from -128 to 127 left to right, y from
//! 127 at the top down to pyoro's feet, with the ground on the last row.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, queue, style, terminal};
use glam::IVec2;

use super::{FrameClock, Input, PlatformError, Renderer};
use crate::consts::PYORO_START_Y;
use crate::sim::{Direction, Facing, GameEvent, Ground};

const SCREEN_LEFT: i32 = -128;
const SCREEN_RIGHT: i32 = 127;
const SCREEN_TOP: i32 = 127;
/// Lowest drawn height (pyoro's row); the ground row sits below it
const SCREEN_BOTTOM: i32 = PYORO_START_Y;

/// Without key release events a key counts as held this many frames after
/// its last press or auto-repeat. Covers the usual 250-500 ms delay before
/// the first auto-repeat at 50 Hz.
const HOLD_FRAMES: u32 = 25;

/// Length of the drawn shot line in screen units
const SHOT_LENGTH: i32 = 254;

/// Character canvas in console coordinates
#[derive(Debug, Clone)]
pub struct Grid {
    cols: u16,
    rows: u16,
    cells: Vec<char>,
}

impl Grid {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![' '; cols as usize * rows as usize],
        }
    }

    pub fn column(&self, x: i32) -> i32 {
        let span = SCREEN_RIGHT - SCREEN_LEFT;
        (x - SCREEN_LEFT) * (self.cols as i32 - 1) / span
    }

    pub fn row(&self, y: i32) -> i32 {
        let span = SCREEN_TOP - SCREEN_BOTTOM;
        let play_rows = self.rows as i32 - 2;
        ((SCREEN_TOP - y) * play_rows / span).clamp(0, play_rows.max(0))
    }

    fn put(&mut self, col: i32, row: i32, ch: char) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells[index] = ch;
    }

    fn plot(&mut self, pos: IVec2, ch: char) {
        self.put(self.column(pos.x), self.row(pos.y), ch);
    }

    /// Rows of the canvas, top first
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks((self.cols as usize).max(1))
            .map(|line| line.iter().collect())
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }
}

impl Renderer for Grid {
    fn draw_player(&mut self, pos: IVec2, facing: Facing) {
        let col = self.column(pos.x);
        let row = self.row(pos.y);
        let (beak, offset) = match facing {
            Facing::Left => ('<', -1),
            Facing::Right => ('>', 1),
        };
        self.put(col, row, '@');
        self.put(col + offset, row, beak);
    }

    fn draw_bean(&mut self, pos: IVec2) {
        self.plot(pos, 'o');
    }

    fn draw_ground(&mut self, ground: &Ground) {
        let row = self.rows as i32 - 1;
        for (lane, solid) in ground.lanes() {
            if !solid {
                continue;
            }
            let start = self.column(lane.left_border());
            let end = self.column(lane.right_border() - 1);
            for col in start..=end {
                self.put(col, row, '=');
            }
        }
    }

    fn draw_shot(&mut self, from: IVec2, facing: Facing) {
        let (dir, ch) = match facing {
            Facing::Left => (-1, '\\'),
            Facing::Right => (1, '/'),
        };
        let step = ((SCREEN_TOP - SCREEN_BOTTOM) / (self.rows as i32).max(1)).max(1);
        for d in (step..SHOT_LENGTH).step_by(step as usize) {
            let pos = from + IVec2::new(dir * d, d);
            if pos.x < SCREEN_LEFT || pos.x > SCREEN_RIGHT || pos.y > SCREEN_TOP {
                break;
            }
            self.plot(pos, ch);
        }
    }

    fn show_message(&mut self, text: &str, pos: IVec2) {
        let col = self.column(pos.x);
        let row = self.row(pos.y);
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch);
        }
    }
}

/// Keyboard state folded into controller state, one frame at a time
#[derive(Debug, Clone, Default)]
pub struct Keys {
    /// Terminal reports key releases
    releases: bool,
    held: Direction,
    hold_frames: u32,
    fire: bool,
    quit: bool,
}

impl Keys {
    pub fn new(releases: bool) -> Self {
        Self {
            releases,
            ..Default::default()
        }
    }

    /// Age the held key by one frame
    pub fn next_frame(&mut self) {
        self.hold_frames = self.hold_frames.saturating_sub(1);
        if self.hold_frames == 0 {
            self.held = Direction::None;
        }
    }

    pub fn key(&mut self, key: KeyEvent) {
        let direction = match key.code {
            KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
            _ => None,
        };

        if key.kind == KeyEventKind::Release {
            if direction == Some(self.held) {
                self.held = Direction::None;
                self.hold_frames = 0;
            }
            return;
        }

        if let Some(direction) = direction {
            self.held = direction;
            self.hold_frames = if self.releases { u32::MAX } else { HOLD_FRAMES };
            return;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('z') | KeyCode::Up => self.fire = true,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            _ => {}
        }
    }
}

impl Input for Keys {
    fn poll_direction(&mut self) -> Direction {
        self.held
    }

    /// Fire once per press
    fn poll_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// Runs its cleanup on drop unless disarmed
struct Rollback<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Rollback<F> {
    fn new(cleanup: F) -> Self {
        Self(Some(cleanup))
    }

    fn disarm(mut self) {
        self.0 = None;
    }
}

impl<F: FnOnce()> Drop for Rollback<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}

/// Crossterm renderer, controller and frame clock
pub struct Terminal {
    out: Stdout,
    grid: Grid,
    keys: Keys,
    frame_duration: Duration,
    frame_start: Instant,
    /// Ring the bell with the next frame
    bell: bool,
}

impl Terminal {
    /// Switch the terminal to raw mode on the alternate screen. If a later
    /// step fails the terminal is put back before the error is returned.
    pub fn new(frame_rate_hz: u32) -> Result<Self, PlatformError> {
        terminal::enable_raw_mode()?;
        let rollback = Rollback::new(|| {
            let _ = execute!(
                io::stdout(),
                terminal::LeaveAlternateScreen,
                cursor::Show,
                terminal::EnableLineWrap,
            );
            let _ = terminal::disable_raw_mode();
        });

        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;

        let releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if releases {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::debug!("Terminal key release events: {releases}");

        let (cols, rows) = terminal::size()?;
        rollback.disarm();
        Ok(Self {
            out,
            grid: Grid::new(cols, rows),
            keys: Keys::new(releases),
            frame_duration: Duration::from_secs(1) / frame_rate_hz.max(1),
            frame_start: Instant::now(),
            bell: false,
        })
    }

    fn present(&mut self) -> io::Result<()> {
        for (row, line) in self.grid.lines().enumerate() {
            queue!(self.out, cursor::MoveTo(0, row as u16), style::Print(line))?;
        }
        if std::mem::take(&mut self.bell) {
            queue!(self.out, style::Print('\x07'))?;
        }
        self.out.flush()?;
        self.grid.clear();
        Ok(())
    }

    fn read_events(&mut self) -> io::Result<()> {
        self.keys.next_frame();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => self.keys.key(key),
                Event::Resize(cols, rows) => self.grid = Grid::new(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.keys.releases {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::warn!("Failed to restore terminal: {err}");
        }
    }
}

impl Renderer for Terminal {
    fn draw_player(&mut self, pos: IVec2, facing: Facing) {
        self.grid.draw_player(pos, facing);
    }

    fn draw_bean(&mut self, pos: IVec2) {
        self.grid.draw_bean(pos);
    }

    fn draw_ground(&mut self, ground: &Ground) {
        self.grid.draw_ground(ground);
    }

    fn draw_shot(&mut self, from: IVec2, facing: Facing) {
        self.grid.draw_shot(from, facing);
    }

    fn show_message(&mut self, text: &str, pos: IVec2) {
        self.grid.show_message(text, pos);
    }

    fn on_event(&mut self, event: &GameEvent) {
        if rings_bell(event) {
            self.bell = true;
        }
    }
}

/// Events worth a beep: a bean shot down, a lane lost, pyoro crushed
fn rings_bell(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::BeanShot { .. } | GameEvent::BeanLanded { .. } | GameEvent::PlayerDied { .. }
    )
}

impl Input for Terminal {
    fn poll_direction(&mut self) -> Direction {
        self.keys.poll_direction()
    }

    fn poll_fire(&mut self) -> bool {
        self.keys.poll_fire()
    }

    fn quit_requested(&self) -> bool {
        self.keys.quit_requested()
    }
}

impl FrameClock for Terminal {
    fn wait_next_frame(&mut self) -> Result<(), PlatformError> {
        self.present()?;

        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }
        self.frame_start = Instant::now();

        self.read_events()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::Lane;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_grid_corners() {
        let grid = Grid::new(80, 24);
        assert_eq!(grid.column(SCREEN_LEFT), 0);
        assert_eq!(grid.column(SCREEN_RIGHT), 79);
        assert_eq!(grid.row(SCREEN_TOP), 0);
        assert_eq!(grid.row(PYORO_START_Y), 22);
        // Anything lower is drawn on pyoro's row, never on the ground row
        assert_eq!(grid.row(-128), 22);
    }

    #[test]
    fn test_grid_draws_ground_gaps() {
        let mut grid = Grid::new(80, 24);
        let mut ground = Ground::default();
        grid.draw_ground(&ground);
        let full = grid.lines().last().unwrap();
        grid.clear();

        ground.break_lane(Lane::new(8).unwrap());
        grid.draw_ground(&ground);
        let broken = grid.lines().last().unwrap();

        // Edge columns are shared with the neighbouring lanes
        let gap_start = grid.column(4) as usize;
        let gap_end = grid.column(12) as usize;
        assert!(full[gap_start..=gap_end].chars().all(|c| c == '='));
        assert!(broken[gap_start..=gap_end].chars().all(|c| c == ' '));
        let solid = |line: &str| line.chars().filter(|c| *c == '=').count();
        assert!(solid(&broken) < solid(&full));
    }

    #[test]
    fn test_grid_player_and_message() {
        let mut grid = Grid::new(80, 24);
        grid.draw_player(IVec2::new(0, PYORO_START_Y), Facing::Left);
        grid.show_message("GAME OVER", IVec2::new(GAME_OVER_TEXT_X, GAME_OVER_TEXT_Y));
        let lines: Vec<String> = grid.lines().collect();
        let col = grid.column(0) as usize;
        assert_eq!(&lines[22][col - 1..=col], "<@");
        assert!(lines[grid.row(0) as usize].contains("GAME OVER"));
    }

    #[test]
    fn test_grid_shot_goes_up_and_away() {
        let mut grid = Grid::new(80, 24);
        grid.draw_shot(IVec2::new(0, PYORO_START_Y), Facing::Right);
        let lines: Vec<String> = grid.lines().collect();
        let col = grid.column(0) as usize;
        let marks: Vec<(usize, usize)> = lines
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.char_indices()
                    .filter(|(_, c)| *c == '/')
                    .map(move |(c, _)| (row, c))
            })
            .collect();
        assert!(!marks.is_empty());
        assert!(marks.iter().all(|&(row, c)| row < 22 && c > col));
    }

    #[test]
    fn test_keys_hold_without_releases() {
        let mut keys = Keys::new(false);
        keys.next_frame();
        keys.key(press(KeyCode::Left));
        for _ in 0..HOLD_FRAMES {
            assert_eq!(keys.poll_direction(), Direction::Left);
            keys.next_frame();
        }
        assert_eq!(keys.poll_direction(), Direction::None);
    }

    #[test]
    fn test_keys_hold_across_repeat_delay() {
        // 400 ms between the press and the first auto-repeat at 50 Hz
        let mut keys = Keys::new(false);
        keys.key(press(KeyCode::Right));
        for _ in 0..20 {
            keys.next_frame();
            assert_eq!(keys.poll_direction(), Direction::Right);
        }
        keys.key(press(KeyCode::Right));
        for _ in 0..20 {
            keys.next_frame();
            assert_eq!(keys.poll_direction(), Direction::Right);
        }
    }

    #[test]
    fn test_rollback_runs_unless_disarmed() {
        use std::cell::Cell;

        let runs = Cell::new(0);
        let failed = || -> io::Result<()> {
            let _rollback = Rollback::new(|| runs.set(runs.get() + 1));
            Err(io::Error::other("no tty"))
        };
        assert!(failed().is_err());
        assert_eq!(runs.get(), 1);

        let rollback = Rollback::new(|| runs.set(runs.get() + 1));
        rollback.disarm();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_bell_events() {
        let lane = Lane::new(3).unwrap();
        assert!(rings_bell(&GameEvent::BeanShot { lane }));
        assert!(rings_bell(&GameEvent::BeanLanded { lane }));
        assert!(rings_bell(&GameEvent::PlayerDied { lane }));
        assert!(!rings_bell(&GameEvent::BeanSpawned { lane }));
        assert!(!rings_bell(&GameEvent::ShotFired {
            facing: Facing::Left
        }));
    }

    #[test]
    fn test_keys_release_stops_walking() {
        let mut keys = Keys::new(true);
        keys.key(press(KeyCode::Char('d')));
        for _ in 0..100 {
            keys.next_frame();
        }
        assert_eq!(keys.poll_direction(), Direction::Right);
        keys.key(release(KeyCode::Left));
        assert_eq!(keys.poll_direction(), Direction::Right);
        keys.key(release(KeyCode::Char('d')));
        assert_eq!(keys.poll_direction(), Direction::None);
    }

    #[test]
    fn test_keys_fire_once_per_press() {
        let mut keys = Keys::new(false);
        keys.key(press(KeyCode::Char(' ')));
        assert!(keys.poll_fire());
        assert!(!keys.poll_fire());
    }

    #[test]
    fn test_keys_quit() {
        let mut keys = Keys::new(false);
        keys.key(press(KeyCode::Char('c')));
        assert!(!keys.quit_requested());
        keys.key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(keys.quit_requested());
    }
}
