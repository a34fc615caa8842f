//! Snake game simulation.
//!
//! The crate holds only the game rules: the board, the snake, its direction,
//! the food and collision handling. Drawing, timers and key handling live in
//! the `snake` binary, which drives a [`SnakeSimulation`] one tick at a time.

pub mod config;
pub mod simulation;
pub mod snake;

pub use config::{Config, ConfigError};
pub use simulation::{Collision, GameState, GameStatus, SnakeSimulation, TickOutcome};
pub use snake::{Cell, Direction, Snake};
