//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The play loop drives it with commands from gestures and the keyboard.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use clock::TickClock;
pub use config::GameConfig;
pub use engine::{GameSession, StepOutcome};
pub use state::{CollisionType, Position, Snake, StateSnapshot, Status};
