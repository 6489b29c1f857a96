use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::GameConfig;
use grid_snake::controls::{HostInput, poll_input};
use grid_snake::game::{GameSession, GameStatus, TickEvent};
use grid_snake::input::Command;
use grid_snake::score::ScoreStore;
use grid_snake::terminal_runtime::TerminalGuard;
use grid_snake::ui::hud::HudInfo;
use log::{info, warn};

/// Upper bound on how long one input poll blocks between frames.
const FRAME_POLL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Classic grid snake in the terminal")]
struct Cli {
    /// JSON file with game options; flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Initial tick interval in milliseconds.
    #[arg(long, value_name = "MS")]
    interval: Option<u64>,

    /// Speed up every few points and show the high score.
    #[arg(long)]
    advanced: bool,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Do not read or write the persisted high score.
    #[arg(long)]
    no_save: bool,
}

impl Cli {
    fn resolve_config(&self) -> io::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path).map_err(invalid_input)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(interval) = self.interval {
            config.initial_tick_interval_ms = interval;
        }
        if self.advanced {
            config.speed_progression = true;
        }

        config.validate().map_err(invalid_input)?;
        Ok(config)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.resolve_config()?;
    let mut session = match cli.seed {
        Some(seed) => GameSession::new_with_seed(config, seed),
        None => GameSession::new(config),
    }
    .map_err(invalid_input)?;

    let store = (!cli.no_save).then(ScoreStore::default_location);
    let mut high_score = load_high_score(store.as_ref());

    {
        let mut terminal = TerminalGuard::enter()?;
        run(&mut terminal, &mut session, store.as_ref(), &mut high_score)?;
    }

    println!(
        "Game ended! Final score: {} (length {})",
        session.score(),
        session.snake().len()
    );
    Ok(())
}

fn run(
    terminal: &mut TerminalGuard,
    session: &mut GameSession,
    store: Option<&ScoreStore>,
    high_score: &mut u32,
) -> io::Result<()> {
    let advanced = session.config().speed_progression;
    let mut reference_high_score = *high_score;
    let mut last_tick = Instant::now();

    loop {
        let hud_info = HudInfo {
            high_score: *high_score,
            game_over_reference_high_score: reference_high_score,
            advanced,
        };
        terminal.draw(&session.snapshot(), hud_info)?;

        let timeout = session
            .tick_interval()
            .saturating_sub(last_tick.elapsed())
            .min(FRAME_POLL);

        match poll_input(timeout)? {
            Some(HostInput::Quit) => break,
            Some(HostInput::Command(Command::Restart)) => {
                persist_high_score(store, high_score, session.score());
                reference_high_score = *high_score;
                session.restart();
                last_tick = Instant::now();
            }
            Some(HostInput::Command(command)) => {
                session.apply(command);
            }
            None => {}
        }

        if session.status() != GameStatus::Running {
            last_tick = Instant::now();
            continue;
        }

        if last_tick.elapsed() >= session.tick_interval() {
            let event = session.tick();
            last_tick = Instant::now();

            if matches!(
                event,
                TickEvent::WallCollision | TickEvent::SelfCollision | TickEvent::Won
            ) {
                persist_high_score(store, high_score, session.score());
            }
        }
    }

    persist_high_score(store, high_score, session.score());
    Ok(())
}

fn load_high_score(store: Option<&ScoreStore>) -> u32 {
    let Some(store) = store else {
        return 0;
    };

    match store.load() {
        Ok(score) => score,
        Err(error) => {
            warn!(
                "ignoring unreadable high score file {}: {error}",
                store.path().display()
            );
            0
        }
    }
}

fn persist_high_score(store: Option<&ScoreStore>, high_score: &mut u32, score: u32) {
    let previous = *high_score;
    *high_score = previous.max(score);

    let Some(store) = store else {
        return;
    };
    match store.record(score, previous) {
        Ok(true) => info!("new high score {score}"),
        Ok(false) => {}
        Err(error) => warn!("failed to save high score: {error}"),
    }
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn invalid_input(error: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "grid-snake",
            "--width",
            "12",
            "--height",
            "8",
            "--interval",
            "200",
            "--advanced",
        ])
        .expect("flags should parse");

        let config = cli.resolve_config().expect("config should be valid");
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 8);
        assert_eq!(config.initial_tick_interval_ms, 200);
        assert!(config.speed_progression);
    }

    #[test]
    fn classic_mode_accepts_an_interval_below_the_speed_floor() {
        let cli = Cli::try_parse_from(["grid-snake", "--interval", "40"])
            .expect("flags should parse");

        let config = cli.resolve_config().expect("classic config should be valid");
        assert_eq!(config.initial_tick_interval_ms, 40);
        assert!(!config.speed_progression);
    }

    #[test]
    fn advanced_mode_rejects_an_interval_below_the_speed_floor() {
        let cli = Cli::try_parse_from(["grid-snake", "--interval", "40", "--advanced"])
            .expect("flags should parse");

        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn degenerate_grid_flag_is_rejected() {
        let cli = Cli::try_parse_from(["grid-snake", "--width", "0"]).expect("flags should parse");

        assert!(cli.resolve_config().is_err());
    }
}
