//! Gesture Snake - Snake steered by pointing at a webcam
//!
//! This library provides:
//! - Core game logic (game module)
//! - Hand gesture interpretation (gesture module)
//! - Camera and hand-tracker plumbing (vision module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive play loop (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod gesture;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod vision;
