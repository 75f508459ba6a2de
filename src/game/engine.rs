use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::info;

use super::{
    action::{Command, Direction},
    config::GameConfig,
    state::{CollisionType, Position, Snake, StateSnapshot, Status},
};

/// Rejection-sampling attempts before falling back to scanning the free cells
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Outcome of a single advance of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Snake moved into an empty cell
    Moved,
    /// Snake moved onto food and grew
    Ate,
    /// Snake hit something and the round is over
    Collided(CollisionType),
    /// Snake filled the grid
    Won,
    /// Session was not running, nothing moved
    Idle,
}

/// The game state machine: one snake, one food, one score.
///
/// Lifecycle: `NotStarted -> Running <-> Paused`, `Running -> GameOver | Won`,
/// and `GameOver | Won -> Running` through `Restart`. Commands that make no
/// sense in the current status are ignored.
pub struct GameSession<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    /// Direction the next step will take
    pending: Direction,
    food: Option<Position>,
    score: u32,
    high_score: u32,
    status: Status,
    collision: Option<CollisionType>,
}

impl GameSession<StdRng> {
    /// Create a session seeded from the operating system
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a session with a reproducible food sequence
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Create a session drawing food positions from `rng`.
    ///
    /// `config` must pass [`GameConfig::validate`]; a zero tick interval or
    /// an empty grid leaves the session unable to run.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "GameSession needs a validated GameConfig"
        );
        let snake = Self::initial_snake(&config);

        Self {
            config,
            rng,
            pending: snake.direction,
            snake,
            food: None,
            score: 0,
            high_score: 0,
            status: Status::NotStarted,
            collision: None,
        }
    }

    fn initial_snake(config: &GameConfig) -> Snake {
        let center_x = (config.grid_width / 2) as i32;
        let center_y = (config.grid_height / 2) as i32;

        Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            config.initial_snake_length,
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Direction the next step will take
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Current tick interval, derived from the snake's length
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval_for_length(self.snake.len())
    }

    /// Current speed in ticks per second
    pub fn speed(&self) -> f64 {
        1.0 / self.tick_interval().as_secs_f64()
    }

    /// Apply one command and, unless it was a lifecycle command, advance one step.
    pub fn tick(&mut self, command: Option<Command>) -> StateSnapshot {
        match command {
            Some(command) if command.is_lifecycle() => self.handle(command),
            Some(command) => {
                self.handle(command);
                self.step();
            }
            None => {
                self.step();
            }
        }

        self.snapshot()
    }

    /// Apply a command without advancing the snake
    pub fn handle(&mut self, command: Command) {
        match (command, self.status) {
            (Command::Start, Status::NotStarted) => self.start_round(),
            (Command::Restart, status) if status.is_finished() => self.start_round(),
            (Command::Pause, Status::Running) => {
                self.status = Status::Paused;
                info!(score = self.score, "Paused");
            }
            (Command::Pause, Status::Paused) => {
                self.status = Status::Running;
                info!(score = self.score, "Resumed");
            }
            (Command::Move(direction), Status::Running) => self.steer(direction),
            _ => {}
        }
    }

    fn steer(&mut self, direction: Direction) {
        // Compare against the last move, not the pending turn, so two quick
        // turns inside one tick can never reverse the snake
        if !self.snake.direction.is_opposite(direction) {
            self.pending = direction;
        }
    }

    fn start_round(&mut self) {
        self.snake = Self::initial_snake(&self.config);
        self.pending = self.snake.direction;
        self.score = 0;
        self.collision = None;
        self.status = Status::Running;

        self.food = self.spawn_food();
        if self.food.is_none() {
            self.finish(Status::Won);
            return;
        }

        info!(
            width = self.config.grid_width,
            height = self.config.grid_height,
            "Round started"
        );
    }

    /// Advance the snake one cell in the pending direction
    pub fn step(&mut self) -> StepOutcome {
        if self.status != Status::Running {
            return StepOutcome::Idle;
        }

        self.snake.direction = self.pending;
        let new_head = self.snake.head().moved_in_direction(self.pending);

        if !self.is_in_bounds(new_head) {
            return self.collide(CollisionType::Wall);
        }

        let ate_food = self.food == Some(new_head);

        if self.snake.would_collide(new_head, ate_food) {
            return self.collide(CollisionType::SelfCollision);
        }

        self.snake.advance_to(new_head, ate_food);

        if !ate_food {
            return StepOutcome::Moved;
        }

        self.score += self.config.food_points;
        self.food = self.spawn_food();

        if self.food.is_none() {
            self.finish(Status::Won);
            return StepOutcome::Won;
        }

        StepOutcome::Ate
    }

    fn collide(&mut self, collision: CollisionType) -> StepOutcome {
        self.collision = Some(collision);
        self.finish(Status::GameOver);
        StepOutcome::Collided(collision)
    }

    fn finish(&mut self, status: Status) {
        self.status = status;
        self.high_score = self.high_score.max(self.score);

        info!(
            score = self.score,
            high_score = self.high_score,
            length = self.snake.len(),
            status = status.as_str(),
            "Round finished"
        );
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.config.grid_width as i32
            && pos.y >= 0
            && pos.y < self.config.grid_height as i32
    }

    /// Pick a uniformly random free cell, or `None` when the snake fills the grid
    fn spawn_food(&mut self) -> Option<Position> {
        if self.snake.len() >= self.config.cell_count() {
            return None;
        }

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = self.random_cell();
            if !self.snake.contains(pos) {
                return Some(pos);
            }
        }

        // Crowded grid: choose among the free cells directly
        let free: Vec<Position> = (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|&pos| !self.snake.contains(pos))
            .collect();

        if free.is_empty() {
            return None;
        }

        Some(free[self.rng.gen_range(0..free.len())])
    }

    fn random_cell(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x, y)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let tick_interval = self.tick_interval();

        StateSnapshot {
            snake: self.snake.cells().copied().collect(),
            direction: self.pending,
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            speed: 1.0 / tick_interval.as_secs_f64(),
            tick_interval,
            status: self.status,
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
            collision: self.collision,
        }
    }
}
