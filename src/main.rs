use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_arcade::game::GameConfig;
use snake_arcade::modes::{ArcadeMode, SnakeMode, default_catalog};
use snake_arcade::persistence::JsonFileStore;
use snake_arcade::relay::FramePolicy;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Terminal game arcade hosting Snake")]
struct Cli {
    /// Run the whole arcade, or Snake on its own
    #[arg(long, default_value = "arcade")]
    mode: Mode,

    /// Cells along each side of the grid
    #[arg(long, default_value = "20")]
    tiles: u32,

    /// Canvas units per cell
    #[arg(long)]
    cell_size: Option<u32>,

    /// Where high scores and the log file are kept
    #[arg(long, default_value = ".snake_arcade")]
    data_dir: PathBuf,

    /// Mount games as cross-origin frames (message relay only)
    #[arg(long)]
    cross_origin: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Game menu with games mounted behind the key relay
    Arcade,
    /// Play snake directly with keyboard controls
    Snake,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("Failed to create data directory {}", cli.data_dir.display()))?;
    init_tracing(&cli.data_dir)?;

    // Create game configuration from CLI arguments
    let mut config = GameConfig::default();
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    config.canvas_size = cli.tiles.saturating_mul(config.cell_size);
    config.validate().context("Invalid game configuration")?;

    info!(tiles = config.tile_count(), data_dir = %cli.data_dir.display(), "starting");

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Arcade => {
            let policy = if cli.cross_origin {
                FramePolicy::cross_origin()
            } else {
                FramePolicy::default()
            };
            let mut arcade = ArcadeMode::new(default_catalog(), config, cli.data_dir, policy);
            arcade.run().await?;
        }
        Mode::Snake => {
            let store = JsonFileStore::new(&cli.data_dir, "snake");
            let mut snake = SnakeMode::new(config, Box::new(store))?;
            snake.run().await?;
        }
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the TUI
fn init_tracing(data_dir: &Path) -> Result<()> {
    let path = data_dir.join("snake_arcade.log");
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}
