use anyhow::{Context, Result};
use clap::Parser;
use gesture_snake::config::Config;
use gesture_snake::modes::PlayMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gesture_snake")]
#[command(version, about = "Snake steered by pointing at a webcam")]
struct Cli {
    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Seed for food placement, for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Hand tracker program; it must print one JSON detection per line.
    /// Without one the game is keyboard-only.
    #[arg(long)]
    tracker: Option<String>,

    /// Argument passed to the tracker program (repeatable)
    #[arg(long = "tracker-arg", allow_hyphen_values = true)]
    tracker_args: Vec<String>,

    /// Use the camera image as-is instead of mirroring it
    #[arg(long)]
    no_mirror: bool,

    /// Log file; the terminal belongs to the game
    #[arg(long, default_value = "gesture-snake.log")]
    log_file: PathBuf,
}

impl Cli {
    /// Load the config file and apply command-line overrides
    fn config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(self.config.as_deref())?;

        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(tracker) = &self.tracker {
            config.capture.tracker_program = Some(tracker.clone());
            config.capture.tracker_args = self.tracker_args.clone();
        } else if !self.tracker_args.is_empty() {
            config.capture.tracker_args = self.tracker_args.clone();
        }
        if self.no_mirror {
            config.gesture.mirror_x = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    // The TUI owns the terminal, so logs go to a file
    let log_file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;
    let config = cli.config().context("Invalid configuration")?;

    info!(
        width = config.game.grid_width,
        height = config.game.grid_height,
        gestures = config.gesture_control_enabled(),
        "Starting"
    );

    let mut play_mode = PlayMode::new(config, cli.seed);
    play_mode.run().await?;

    Ok(())
}
