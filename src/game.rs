use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::{ConfigError, GameConfig, GridSize};
use crate::food::Food;
use crate::input::{Command, Direction};
use crate::snake::{Position, Snake};
use crate::speed::{SpeedPolicy, policy_for};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Running,
    Paused,
    Terminated,
}

/// Why a session reached `GameStatus::Terminated`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Termination {
    Wall,
    SelfCollision,
    /// The snake covers every cell; no room is left for food.
    GridFilled,
}

/// Outcome of one `tick()` call.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum TickEvent {
    Moved { ate_food: bool },
    WallCollision,
    SelfCollision,
    Won,
    NotRunning,
}

/// Read-only view of a session handed to hosts after every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub grid: GridSize,
    pub status: GameStatus,
    /// Snake cells, head first.
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub score: u32,
    pub best_score: u32,
    pub length: usize,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
    pub tick_interval_ms: u64,
    pub ticks: u64,
    pub last_event: Option<TickEvent>,
    pub termination: Option<Termination>,
}

impl Snapshot {
    /// Recommended delay before the host's next `tick()`.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

/// Complete mutable game state for one session.
///
/// All mutation goes through `tick`, `set_direction`, `toggle_pause` and
/// `restart`; hosts only read.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    grid: GridSize,
    snake: Snake,
    food: Option<Food>,
    score: u32,
    best_score: u32,
    ticks: u64,
    status: GameStatus,
    termination: Option<Termination>,
    last_event: Option<TickEvent>,
    speed: Arc<dyn SpeedPolicy>,
    rng: StdRng,
}

impl GameSession {
    /// Creates a session whose food placement is seeded from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let speed = policy_for(&config);
        Self::build(config, speed, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let speed = policy_for(&config);
        Self::build(config, speed, StdRng::seed_from_u64(seed))
    }

    /// Creates a seeded session driven by a caller-supplied speed policy.
    pub fn with_policy(
        config: GameConfig,
        speed: Arc<dyn SpeedPolicy>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(config, speed, StdRng::seed_from_u64(seed))
    }

    /// Creates a running session from an explicit snake and food cell.
    ///
    /// Later food placement uses `seed`. A later `restart()` returns to the
    /// canonical start layout.
    pub fn from_layout(
        config: GameConfig,
        snake: Snake,
        food: Position,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut session = Self::new_with_seed(config, seed)?;
        let grid = session.grid;

        let mut seen = HashSet::with_capacity(snake.len());
        for segment in snake.segments() {
            if !grid.contains(*segment) {
                return Err(ConfigError::InvalidLayout("snake segment outside the grid"));
            }
            if !seen.insert(*segment) {
                return Err(ConfigError::InvalidLayout("snake overlaps itself"));
            }
        }
        if !grid.contains(food) {
            return Err(ConfigError::InvalidLayout("food outside the grid"));
        }
        if snake.occupies(food) {
            return Err(ConfigError::InvalidLayout("food placed on the snake"));
        }

        session.snake = snake;
        session.food = Some(Food::new(food));
        Ok(session)
    }

    fn build(
        config: GameConfig,
        speed: Arc<dyn SpeedPolicy>,
        mut rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = config.grid();
        let snake = Snake::new(grid.start_position(), Direction::Right);
        let food = Food::spawn(&mut rng, grid, &snake);

        info!(
            "new session on {}x{} grid, speed progression {}",
            grid.width,
            grid.height,
            if config.speed_progression { "on" } else { "off" }
        );

        Ok(Self {
            config,
            grid,
            snake,
            food,
            score: 0,
            best_score: 0,
            ticks: 0,
            status: GameStatus::Running,
            termination: None,
            last_event: None,
            speed,
            rng,
        })
    }

    /// Delivers one host command and returns the resulting snapshot.
    pub fn apply(&mut self, command: Command) -> Snapshot {
        match command {
            Command::SetDirection(direction) => {
                self.set_direction(direction);
            }
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Restart => self.restart(),
            Command::Tick => {
                self.tick();
            }
        }

        self.snapshot()
    }

    /// Queues a direction for the next tick.
    ///
    /// Ignored unless running; reversals of the committed direction are
    /// dropped. Returns whether the request was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        let accepted = self.snake.request_direction(direction);
        if !accepted {
            debug!(
                "dropped reversal {direction:?} while heading {:?}",
                self.snake.direction()
            );
        }
        accepted
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickEvent {
        let event = self.advance();
        self.last_event = Some(event);
        event
    }

    fn advance(&mut self) -> TickEvent {
        if self.status != GameStatus::Running {
            return TickEvent::NotRunning;
        }

        self.snake.commit_direction();
        let new_head = self.snake.next_head_position();
        self.ticks += 1;

        if !self.grid.contains(new_head) {
            self.terminate(Termination::Wall);
            return TickEvent::WallCollision;
        }

        let ate_food = self.food.is_some_and(|food| food.position == new_head);
        if self.snake.collides_with_body(new_head, ate_food) {
            self.terminate(Termination::SelfCollision);
            return TickEvent::SelfCollision;
        }

        self.snake.advance(new_head, ate_food);
        if !ate_food {
            return TickEvent::Moved { ate_food: false };
        }

        self.score = self.score.saturating_add(self.config.food_reward);
        self.best_score = self.best_score.max(self.score);
        self.food = Food::spawn(&mut self.rng, self.grid, &self.snake);
        debug!(
            "ate food at ({}, {}), score {}, length {}",
            new_head.x,
            new_head.y,
            self.score,
            self.snake.len()
        );

        if self.food.is_none() {
            self.terminate(Termination::GridFilled);
            return TickEvent::Won;
        }

        TickEvent::Moved { ate_food: true }
    }

    fn terminate(&mut self, reason: Termination) {
        self.status = GameStatus::Terminated;
        self.termination = Some(reason);
        info!(
            "session over: {reason:?}, score {}, length {}",
            self.score,
            self.snake.len()
        );
    }

    /// Toggles `Running <-> Paused`; returns the status afterwards.
    pub fn toggle_pause(&mut self) -> GameStatus {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            GameStatus::Terminated => GameStatus::Terminated,
        };
        debug!("pause toggled, now {:?}", self.status);
        self.status
    }

    /// Resets to a fresh session from any state.
    ///
    /// Config, speed policy, random stream and best score carry over.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.grid.start_position(), Direction::Right);
        self.food = Food::spawn(&mut self.rng, self.grid, &self.snake);
        self.score = 0;
        self.ticks = 0;
        self.status = GameStatus::Running;
        self.termination = None;
        self.last_event = None;
        debug!("session restarted");
    }

    /// Captures the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            status: self.status,
            snake: self.snake.segments().copied().collect(),
            food: self.food(),
            score: self.score,
            best_score: self.best_score,
            length: self.snake.len(),
            direction: self.snake.direction(),
            pending_direction: self.snake.pending_direction(),
            tick_interval_ms: u64::try_from(self.tick_interval().as_millis()).unwrap_or(u64::MAX),
            ticks: self.ticks,
            last_event: self.last_event,
            termination: self.termination,
        }
    }

    /// Interval the host should wait between ticks at the current score.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.speed.interval_for(self.score)
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food.map(|food| food.position)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Highest score reached in this session across restarts.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
