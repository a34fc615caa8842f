mod game;
mod term;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use game::{GameOptions, SnakeGame};
use snake::config::DEFAULT_CELL_SIZE;

#[derive(Parser)]
#[command(name = "snake", version, about = "Snake in the terminal")]
struct Cli {
    /// Board width in cells (default: fit the terminal)
    #[arg(long)]
    columns: Option<u16>,

    /// Board height in cells (default: fit the terminal)
    #[arg(long)]
    rows: Option<u16>,

    /// Side of one cell in board units
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE, value_parser = clap::value_parser!(i32).range(1..))]
    cell_size: i32,

    /// Milliseconds between two steps of the snake
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here; the filter is read from RUST_LOG
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let options = GameOptions {
        columns: cli.columns,
        rows: cli.rows,
        cell_size: cli.cell_size,
        tick_interval: Duration::from_millis(cli.tick_ms),
        seed: cli.seed,
    };

    // The main game loop takes care of restoring the terminal on exit
    let mut game = SnakeGame::new(&options)?;
    game.run()
}

// The terminal belongs to the game, so logs only ever go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
