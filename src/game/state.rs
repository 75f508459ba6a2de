use std::collections::VecDeque;
use std::time::Duration;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Direction of the most recent move
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit cells, head first
    #[cfg(test)]
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = Position>, direction: Direction) -> Self {
        let body: VecDeque<Position> = cells.into_iter().collect();
        assert!(!body.is_empty(), "snake needs at least one cell");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn cells(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check whether moving the head onto `pos` would hit the body.
    ///
    /// The tail cell is vacated during the same move unless the snake grows,
    /// so it only counts as an obstacle when `growing` is true.
    pub fn would_collide(&self, pos: Position, growing: bool) -> bool {
        let blocking = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(blocking).any(|&cell| cell == pos)
    }

    /// Push a new head, dropping the tail unless the snake grows
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NotStarted,
    Running,
    Paused,
    /// Round ended in a collision
    GameOver,
    /// Round ended with the whole grid filled
    Won,
}

impl Status {
    /// True when the round has ended and only Restart is accepted
    pub fn is_finished(&self) -> bool {
        matches!(self, Status::GameOver | Status::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "Ready",
            Status::Running => "Playing",
            Status::Paused => "Paused",
            Status::GameOver => "Game Over",
            Status::Won => "Won",
        }
    }
}

/// Read-only view of a session, handed to the renderer every frame
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Option<Position>,
    pub score: u32,
    pub high_score: u32,
    /// Ticks per second
    pub speed: f64,
    pub tick_interval: Duration,
    pub status: Status,
    pub grid_width: usize,
    pub grid_height: usize,
    /// What ended the round, if it ended in a collision
    pub collision: Option<CollisionType>,
}

impl StateSnapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn is_snake(&self, pos: Position) -> bool {
        self.snake.contains(&pos)
    }
}
