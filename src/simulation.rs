use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::snake::{Cell, Direction, Snake};

/// Rejection sampling gives up after this many draws per free cell and
/// falls back to scanning the board.
const SAMPLES_PER_FREE_CELL: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// What a call to [`SnakeSimulation::tick`] did, for incremental drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was already over; nothing changed.
    Halted,
    Moved {
        new_head: Cell,
        old_head: Cell,
        /// `None` on the step after eating, when the tail stays put.
        old_tail: Option<Cell>,
        ate_food: bool,
    },
    Crashed {
        collision: Collision,
        new_head: Cell,
        old_tail: Option<Cell>,
    },
}

/// Everything that changes while playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub food: Cell,
    pub game_over: bool,
    pub pending_growth: bool,
}

pub struct SnakeSimulation<R = StdRng> {
    config: Config,
    state: GameState,
    rng: R,
}

impl SnakeSimulation<StdRng> {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: Config, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SnakeSimulation<R> {
    pub fn with_rng(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = GameState {
            snake: config.initial_body(),
            direction: Direction::Right,
            food: Cell::default(),
            game_over: false,
            pending_growth: false,
        };

        let mut sim = SnakeSimulation { config, state, rng };
        sim.generate_food();
        Ok(sim)
    }

    /// Resumes from an arbitrary state. The snake must have a head, on the
    /// board unless the game is already over; anything else about the state
    /// (food off the snake, no overlapping segments) is up to the caller.
    pub fn from_state(config: Config, state: GameState, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        if state.snake.is_empty() {
            return Err(ConfigError::EmptySnake);
        }
        let head = state.snake.head();
        if !state.game_over && !config.contains(&head) {
            return Err(ConfigError::SnakeOffBoard(head));
        }

        Ok(SnakeSimulation { config, state, rng })
    }

    /// Turns the snake unless `requested` would reverse it into its own neck.
    /// Returns whether the direction was taken.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.game_over || requested.is_opposite(self.state.direction) {
            return false;
        }

        if requested != self.state.direction {
            debug!(from = ?self.state.direction, to = ?requested, "direction changed");
        }
        self.state.direction = requested;
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.game_over {
            return TickOutcome::Halted;
        }

        let old_head = self.state.snake.head();
        let new_head = old_head.step(self.state.direction, self.config.cell_size);

        let grow = std::mem::take(&mut self.state.pending_growth);
        let old_tail = self.state.snake.advance(new_head, grow);

        if let Some(collision) = self.collision_at(&new_head) {
            self.state.game_over = true;
            info!(?collision, x = new_head.x, y = new_head.y, length = self.state.snake.len(), "game over");
            return TickOutcome::Crashed { collision, new_head, old_tail };
        }

        let ate_food = new_head == self.state.food;
        if ate_food {
            self.state.pending_growth = true;
            self.generate_food();
        }

        TickOutcome::Moved { new_head, old_head, old_tail, ate_food }
    }

    /// Moves the food to a random free cell. Returns `false`, leaving the
    /// food where it was, when the snake covers the whole board.
    pub fn generate_food(&mut self) -> bool {
        let (columns, rows) = (self.config.columns(), self.config.rows());
        let total = columns as usize * rows as usize;
        let free = total.saturating_sub(self.state.snake.len());

        for _ in 0..free.max(1).saturating_mul(SAMPLES_PER_FREE_CELL) {
            let cell = Cell::new(
                self.rng.gen_range(0..columns) * self.config.cell_size,
                self.rng.gen_range(0..rows) * self.config.cell_size,
            );

            if !self.state.snake.contains(&cell) {
                return self.place_food(cell);
            }
        }

        // Either the board is nearly full or we've been very unlucky
        let size = self.config.cell_size;
        let snake = &self.state.snake;
        let choice = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Cell::new(col * size, row * size)))
            .filter(|cell| !snake.contains(cell))
            .choose(&mut self.rng);

        match choice {
            Some(cell) => self.place_food(cell),
            None => {
                warn!(length = self.state.snake.len(), "no free cell left for food");
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = GameState {
            snake: self.config.initial_body(),
            direction: Direction::Right,
            food: self.state.food,
            game_over: false,
            pending_growth: false,
        };
        self.generate_food();
        debug!(food = ?self.state.food, "game reset");
    }

    ///////////////////////////////////////////////////////////////////////////

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    pub fn head(&self) -> Cell {
        self.state.snake.head()
    }

    pub fn food(&self) -> Cell {
        self.state.food
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn has_pending_growth(&self) -> bool {
        self.state.pending_growth
    }

    pub fn status(&self) -> GameStatus {
        if self.state.game_over {
            GameStatus::GameOver
        } else {
            GameStatus::Running
        }
    }

    /// Cells grown since spawn.
    pub fn score(&self) -> usize {
        self.state.snake.len().saturating_sub(self.config.initial_length)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn collision_at(&self, head: &Cell) -> Option<Collision> {
        if !self.config.contains(head) {
            Some(Collision::Wall)
        } else if self.state.snake.hits_body(head) {
            Some(Collision::SelfCollision)
        } else {
            None
        }
    }

    fn place_food(&mut self, cell: Cell) -> bool {
        debug!(x = cell.x, y = cell.y, "food placed");
        self.state.food = cell;
        true
    }
}
