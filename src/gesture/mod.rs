//! Gesture interpretation: hand landmarks in, game commands out.
//!
//! Nothing here touches the game session; the play loop forwards the
//! returned commands.

pub mod fist;
pub mod interpreter;
pub mod landmarks;
pub mod smoothing;

pub use fist::{FistTracker, HandPose};
pub use interpreter::{classify, GestureCommand, GestureConfig, GestureInterpreter, InterpreterState};
pub use landmarks::{HandLandmarks, Point, LANDMARK_COUNT};
pub use smoothing::Smoother;
