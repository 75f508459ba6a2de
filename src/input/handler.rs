use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Space/Enter: start the first round or restart a finished one
    Confirm,
    Restart,
    Pause,
    Steer(Direction),
    Quit,
    None,
}

impl KeyAction {
    /// Game command for this key in the given status, if any
    pub fn command(&self, status: Status) -> Option<Command> {
        match self {
            KeyAction::Confirm => match status {
                Status::NotStarted => Some(Command::Start),
                status if status.is_finished() => Some(Command::Restart),
                _ => None,
            },
            KeyAction::Restart => Some(Command::Restart),
            KeyAction::Pause => Some(Command::Pause),
            KeyAction::Steer(direction) => Some(Command::Move(*direction)),
            KeyAction::Quit | KeyAction::None => None,
        }
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Keyboard steering, for play without a tracker
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Confirm,
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Pause,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
