use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

/// Command accepted by the game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Steer towards a direction (ignored if it reverses the snake)
    Move(Direction),
    /// Toggle between Running and Paused
    Pause,
    /// Begin the first round
    Start,
    /// Begin a new round after the previous one ended
    Restart,
}

impl Command {
    /// Lifecycle commands change the session status and never advance the snake
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, Command::Move(_))
    }
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Command::Move(direction)
    }
}
