use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;
use tracing::{debug, error, info};

use snake::config::DEFAULT_CELL_SIZE;
use snake::{Cell, Config, Direction::{self, *}, SnakeSimulation, TickOutcome};

use crate::term::{Coords, Glyph, TermInt, TermManager};

/// Cap when fitting a board to the terminal: the whole 15-unit cells of the
/// default 800x800 arena.
const MAX_COLUMNS: TermInt = 53;
const MAX_ROWS: TermInt = 53;

const SNAKE_BODY: Glyph = Glyph::new('█', Color::Yellow);
const FOOD: Glyph = Glyph::new('●', Color::Green);
const DEAD_SNAKE: Glyph = Glyph::new('X', Color::Red);

pub struct GameOptions {
    pub columns: Option<TermInt>,
    pub rows: Option<TermInt>,
    pub cell_size: i32,
    pub tick_interval: Duration,
    pub seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum KeyAction {
    Turn(Direction),
    Pause,
    Quit,
    Nothing,
}

enum Flow {
    Restart,
    Quit,
}

pub struct SnakeGame {
    term: TermManager,
    sim: SnakeSimulation,
    tick_interval: Duration,
    paused: bool,
}

impl SnakeGame {
    pub fn new(options: &GameOptions) -> Result<Self> {
        let term = TermManager::new()?;

        // Every cell is two characters wide, plus one border on each side
        let (term_w, term_h) = term.get_terminal_size();
        let fit = (term_w.saturating_sub(2) / 2, term_h.saturating_sub(2));

        let config = board_config(options, fit)?;
        let sim = match options.seed {
            Some(seed) => SnakeSimulation::seeded(config, seed)?,
            None => SnakeSimulation::new(config)?,
        };

        info!(
            width = config.width,
            height = config.height,
            cell_size = config.cell_size,
            seed = ?options.seed,
            "board ready"
        );
        Ok(SnakeGame { term, sim, tick_interval: options.tick_interval, paused: false })
    }

    /// Takes over the terminal until the player quits, and hands it back
    /// afterwards whether or not something failed.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let result = self.run_sessions();
        let restored = self.term.restore();

        if let Err(err) = &restored {
            error!(?err, "failed to restore terminal");
        }
        result.and(restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_sessions(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            match self.play()? {
                Flow::Quit => return Ok(()),
                Flow::Restart => {
                    info!(score = self.sim.score(), "restarting");
                    self.sim.reset();
                }
            }
        }
    }

    fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines)?;
        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(!is_ctrl_c(&key))
    }

    fn play(&mut self) -> Result<Flow> {
        self.paused = false;
        self.term.clear()?;
        let border = self.border_size();
        self.term.draw_borders(border)?;
        self.print_board()?;

        let mut dir_change: Option<Direction> = None;
        let mut next_tick = Instant::now() + self.tick_interval;

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            if let Some(key) = self.term.poll_key(timeout)? {
                match key_action(&key) {
                    KeyAction::Quit => return Ok(Flow::Quit),
                    KeyAction::Pause => self.toggle_pause()?,
                    KeyAction::Turn(dir) if !self.paused => dir_change = Some(dir),
                    _ => {}
                }
                continue;
            }

            if Instant::now() < next_tick {
                continue;
            }
            next_tick += self.tick_interval;

            if self.paused {
                continue;
            }

            // Only the last key pressed since the previous step counts
            if let Some(dir) = dir_change.take() {
                self.sim.set_direction(dir);
            }

            let outcome = self.sim.tick();
            self.print_update(&outcome)?;

            if let TickOutcome::Crashed { .. } = outcome {
                return self.game_over();
            }
        }
    }

    fn game_over(&mut self) -> Result<Flow> {
        let score = self.sim.score();
        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", score),
            "",
            "Play again? (y/n)",
        ])?;

        loop {
            match play_again(&self.term.read_key_blocking()?) {
                Some(true) => return Ok(Flow::Restart),
                Some(false) => return Ok(Flow::Quit),
                None => {}
            }
        }
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        Ok(())
    }

    fn print_board(&mut self) -> Result<()> {
        let food = self.sim.food();
        self.print_cell(food, FOOD)?;

        let head = head_glyph(self.sim.direction());
        let body: Vec<Cell> = self.sim.snake().cells().copied().collect();
        for (i, cell) in body.into_iter().enumerate() {
            self.print_cell(cell, if i == 0 { head } else { SNAKE_BODY })?;
        }

        self.term.flush()
    }

    fn print_update(&mut self, outcome: &TickOutcome) -> Result<()> {
        match *outcome {
            TickOutcome::Halted => return Ok(()),
            TickOutcome::Moved { new_head, old_head, old_tail, ate_food } => {
                // The tail goes first: the head may have just moved into it
                if let Some(tail) = old_tail {
                    self.print_cell(tail, Glyph::BLANK)?;
                }
                self.print_cell(old_head, SNAKE_BODY)?;
                self.print_cell(new_head, head_glyph(self.sim.direction()))?;

                if ate_food {
                    let food = self.sim.food();
                    self.print_cell(food, FOOD)?;
                }
            }
            TickOutcome::Crashed { old_tail, .. } => {
                if let Some(tail) = old_tail {
                    self.print_cell(tail, Glyph::BLANK)?;
                }
                let body: Vec<Cell> = self.sim.snake().cells().copied().collect();
                for cell in body {
                    self.print_cell(cell, DEAD_SNAKE)?;
                }
            }
        }

        self.term.flush()
    }

    /// Cells off the board (a head that hit the wall) are skipped.
    fn print_cell(&mut self, cell: Cell, glyph: Glyph) -> Result<()> {
        if let Some((x, y)) = self.screen_pos(cell) {
            self.term.print_at((x, y), glyph)?;
            self.term.print_at((x + 1, y), glyph)?;
        }
        Ok(())
    }

    fn screen_pos(&self, cell: Cell) -> Option<Coords> {
        let config = self.sim.config();
        let col = cell.x.div_euclid(config.cell_size);
        let row = cell.y.div_euclid(config.cell_size);

        if !(0..config.board_columns()).contains(&col) || !(0..config.board_rows()).contains(&row) {
            return None;
        }

        Some((1 + 2 * col as TermInt, 1 + row as TermInt))
    }

    fn border_size(&self) -> Coords {
        let config = self.sim.config();
        (2 * config.board_columns() as TermInt + 2, config.board_rows() as TermInt + 2)
    }
}

/// Picks the board for a terminal that can show `fit` cells. Without an
/// explicit size the default arena is used when it fits on screen, and a
/// board sized to the terminal otherwise.
fn board_config(options: &GameOptions, fit: (TermInt, TermInt)) -> Result<Config> {
    if options.columns.is_none() && options.rows.is_none() && options.cell_size == DEFAULT_CELL_SIZE {
        let config = Config::default();
        let fits = i32::from(fit.0) >= config.board_columns() && i32::from(fit.1) >= config.board_rows();
        if fits {
            return Ok(config);
        }
    }

    let columns = options.columns.unwrap_or_else(|| fit.0.min(MAX_COLUMNS));
    let rows = options.rows.unwrap_or_else(|| fit.1.min(MAX_ROWS));
    if columns > fit.0 || rows > fit.1 {
        bail!(
            "a {}x{} board does not fit in this terminal (at most {}x{} cells)",
            columns, rows, fit.0, fit.1
        );
    }

    Config::for_grid(columns.into(), rows.into(), options.cell_size).context("invalid board settings")
}

fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Turn(Right),
        KeyCode::Esc => KeyAction::Pause,
        _ => KeyAction::Nothing,
    }
}

fn play_again(ev: &KeyEvent) -> Option<bool> {
    if is_ctrl_c(ev) {
        return Some(false);
    }

    match ev.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('r') | KeyCode::Enter => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => Some(false),
        _ => None,
    }
}

fn head_glyph(direction: Direction) -> Glyph {
    let ch = match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    };
    Glyph::new(ch, Color::Yellow)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
