use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snake::{Cell, Direction, Snake};

pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 800;
pub const DEFAULT_CELL_SIZE: i32 = 15;
pub const DEFAULT_INITIAL_LENGTH: usize = 3;
pub const DEFAULT_INITIAL_HEAD: Cell = Cell::new(300, 300);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(i32),
    #[error("a {width}x{height} board does not fit in i32 coordinates with {cell_size}-unit cells")]
    TooLarge { width: i64, height: i64, cell_size: i32 },
    #[error("a {width}x{height} board cannot hold a single {cell_size}-unit cell")]
    BoardTooSmall { width: i32, height: i32, cell_size: i32 },
    #[error("the snake needs at least one cell")]
    EmptySnake,
    #[error("initial snake cell ({}, {}) lies outside the board", .0.x, .0.y)]
    SnakeOffBoard(Cell),
    #[error("a snake of {length} cells leaves no room for food on a board of {cells} cells")]
    NoRoomForFood { length: usize, cells: usize },
}

/// Fixed board and spawn settings. The board spans `[0, width)` x
/// `[0, height)` in the same units as the cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    pub initial_length: usize,
    pub initial_head: Cell,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            initial_length: DEFAULT_INITIAL_LENGTH,
            initial_head: DEFAULT_INITIAL_HEAD,
        }
    }
}

impl Config {
    pub fn new(
        width: i32,
        height: i32,
        cell_size: i32,
        initial_length: usize,
        initial_head: Cell,
    ) -> Result<Self, ConfigError> {
        let config = Config { width, height, cell_size, initial_length, initial_head };
        config.validate()?;
        Ok(config)
    }

    /// A board of exactly `columns` x `rows` cells with the snake spawned in
    /// the middle.
    pub fn for_grid(columns: i32, rows: i32, cell_size: i32) -> Result<Self, ConfigError> {
        let width = i64::from(columns) * i64::from(cell_size);
        let height = i64::from(rows) * i64::from(cell_size);
        let too_large = || ConfigError::TooLarge { width, height, cell_size };

        let initial_head = Cell::new(
            (columns / 2).checked_mul(cell_size).ok_or_else(too_large)?,
            (rows / 2).checked_mul(cell_size).ok_or_else(too_large)?,
        );
        Config::new(
            i32::try_from(width).map_err(|_| too_large())?,
            i32::try_from(height).map_err(|_| too_large())?,
            cell_size,
            DEFAULT_INITIAL_LENGTH,
            initial_head,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::CellSize(self.cell_size));
        }

        // A head on the last cell must still be able to step one cell further
        let limit = i64::from(i32::MAX) - i64::from(self.cell_size);
        if i64::from(self.width) > limit || i64::from(self.height) > limit {
            return Err(ConfigError::TooLarge {
                width: self.width.into(),
                height: self.height.into(),
                cell_size: self.cell_size,
            });
        }

        if self.columns() <= 0 || self.rows() <= 0 {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            });
        }

        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        let head = self.initial_head;
        if !self.contains(&head) {
            return Err(ConfigError::SnakeOffBoard(head));
        }

        // The body trails to the left of the head
        let behind = (head.x / self.cell_size) as usize;
        if self.initial_length > behind + 1 {
            let first_off = behind as i32 + 1;
            return Err(ConfigError::SnakeOffBoard(Cell::new(head.x - first_off * self.cell_size, head.y)));
        }

        let cells = self.columns() as usize * self.rows() as usize;
        if self.initial_length >= cells {
            return Err(ConfigError::NoRoomForFood { length: self.initial_length, cells });
        }

        Ok(())
    }

    /// Number of whole cells across. Any remainder of `width` is still on the
    /// board but never receives food.
    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Columns needed to draw the whole board, counting a partial cell at
    /// the right edge.
    pub fn board_columns(&self) -> i32 {
        (self.width + self.cell_size - 1) / self.cell_size
    }

    pub fn board_rows(&self) -> i32 {
        (self.height + self.cell_size - 1) / self.cell_size
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn initial_body(&self) -> Snake {
        Snake::new(self.initial_head, self.initial_length, Direction::Right, self.cell_size)
    }
}
