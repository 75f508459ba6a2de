use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fist::{FistTracker, HandPose};
use super::landmarks::{HandLandmarks, Point};
use super::smoothing::Smoother;
use crate::error::ConfigError;
use crate::game::Direction;

/// Tuning for the gesture interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Weight of the newest fingertip sample, in (0, 1]
    pub smoothing_alpha: f32,
    /// Minimum fingertip displacement from the anchor before a turn is issued
    pub dead_zone: f32,
    /// Fingertip-to-palm ratio below which every finger counts as curled
    pub fist_closed_ratio: f32,
    /// Fingertip-to-palm ratio above which any finger re-opens the hand
    pub fist_open_ratio: f32,
    /// Consecutive frames without a hand before the tracked position is dropped
    pub no_hand_reset_frames: u32,
    /// Flip x so the camera behaves like a mirror
    pub mirror_x: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.35,
            dead_zone: 0.06,
            fist_closed_ratio: 0.6,
            fist_open_ratio: 0.9,
            no_hand_reset_frames: 15,
            mirror_x: true,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::invalid(
                "gesture.smoothing_alpha",
                format!("must be in (0, 1], got {}", self.smoothing_alpha),
            ));
        }
        if !(self.dead_zone >= 0.0) {
            return Err(ConfigError::invalid(
                "gesture.dead_zone",
                format!("must be non-negative, got {}", self.dead_zone),
            ));
        }
        if !(self.fist_closed_ratio > 0.0) {
            return Err(ConfigError::invalid(
                "gesture.fist_closed_ratio",
                format!("must be positive, got {}", self.fist_closed_ratio),
            ));
        }
        if !(self.fist_open_ratio >= self.fist_closed_ratio) {
            return Err(ConfigError::invalid(
                "gesture.fist_open_ratio",
                "must not be below fist_closed_ratio",
            ));
        }
        Ok(())
    }
}

/// What a frame of hand input asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCommand {
    Steer(Direction),
    TogglePause,
}

/// Interpreter state carried from frame to frame
#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterState {
    smoother: Smoother,
    fist: FistTracker,
    missing_frames: u32,
}

impl InterpreterState {
    /// Smoothed fingertip position, `None` until a hand has been seen
    pub fn smoothed_position(&self) -> Option<Point> {
        self.smoother.value()
    }

    pub fn pose(&self) -> HandPose {
        self.fist.pose()
    }

    /// Consecutive frames without a hand
    pub fn missing_frames(&self) -> u32 {
        self.missing_frames
    }

    pub fn is_tracking(&self) -> bool {
        self.smoother.value().is_some()
    }
}

/// Turns per-frame hand landmarks into steering and pause commands.
///
/// The fingertip position is smoothed and compared against an anchor (the
/// snake head on screen). Outside the dead zone the dominant axis of the
/// displacement picks the direction. A newly closed fist toggles pause once
/// per closing; steering is suppressed while the fist is held.
pub struct GestureInterpreter {
    config: GestureConfig,
    state: InterpreterState,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        let state = InterpreterState {
            smoother: Smoother::new(config.smoothing_alpha),
            fist: FistTracker::new(config.fist_closed_ratio, config.fist_open_ratio),
            missing_frames: 0,
        };

        Self { config, state }
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Process one frame.
    ///
    /// `landmarks` is `None` when no usable hand was detected. `anchor` is the
    /// reference point in normalized image space; the frame centre is used
    /// when it is `None`.
    pub fn interpret(
        &mut self,
        landmarks: Option<&HandLandmarks>,
        anchor: Option<Point>,
    ) -> Option<GestureCommand> {
        let Some(hand) = landmarks else {
            self.on_missing_hand();
            return None;
        };

        self.state.missing_frames = 0;

        if self.state.fist.update(hand) {
            debug!("Fist closed, toggling pause");
            return Some(GestureCommand::TogglePause);
        }
        if self.state.fist.pose() == HandPose::Closed {
            return None;
        }

        let raw = if self.config.mirror_x {
            hand.index_tip().mirrored()
        } else {
            hand.index_tip()
        };
        let smoothed = self.state.smoother.update(raw);
        let anchor = anchor.unwrap_or(Point::new(0.5, 0.5));

        classify(smoothed, anchor, self.config.dead_zone).map(GestureCommand::Steer)
    }

    fn on_missing_hand(&mut self) {
        self.state.missing_frames = self.state.missing_frames.saturating_add(1);

        if self.state.missing_frames > self.config.no_hand_reset_frames {
            if self.state.is_tracking() {
                debug!(frames = self.state.missing_frames, "Hand lost, resetting tracker");
            }
            self.state.smoother.reset();
            self.state.fist.reset();
        }
    }
}

/// Direction from `anchor` towards `position`, or `None` inside the dead zone
pub fn classify(position: Point, anchor: Point, dead_zone: f32) -> Option<Direction> {
    let dx = position.x - anchor.x;
    let dy = position.y - anchor.y;

    if (dx * dx + dy * dy).sqrt() <= dead_zone {
        return None;
    }

    // Image y grows downwards, like the grid
    let direction = if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };

    Some(direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::landmarks::fixtures::{fist, pointing_at};

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(GestureConfig {
            mirror_x: false,
            ..Default::default()
        })
    }

    const CENTER: Point = Point::new(0.5, 0.5);

    #[test]
    fn test_classify_dominant_axis() {
        assert_eq!(classify(Point::new(0.8, 0.55), CENTER, 0.06), Some(Direction::Right));
        assert_eq!(classify(Point::new(0.2, 0.45), CENTER, 0.06), Some(Direction::Left));
        assert_eq!(classify(Point::new(0.45, 0.9), CENTER, 0.06), Some(Direction::Down));
        assert_eq!(classify(Point::new(0.55, 0.1), CENTER, 0.06), Some(Direction::Up));
    }

    #[test]
    fn test_classify_dead_zone() {
        assert_eq!(classify(Point::new(0.53, 0.52), CENTER, 0.06), None);
        assert_eq!(classify(CENTER, CENTER, 0.0), None);
    }

    #[test]
    fn test_steers_towards_fingertip() {
        let mut interpreter = interpreter();
        let hand = pointing_at(Point::new(0.2, 0.5));

        let command = interpreter.interpret(Some(&hand), Some(CENTER));
        assert_eq!(command, Some(GestureCommand::Steer(Direction::Left)));
    }

    #[test]
    fn test_anchor_defaults_to_frame_center() {
        let mut interpreter = interpreter();
        let hand = pointing_at(Point::new(0.5, 0.1));

        let command = interpreter.interpret(Some(&hand), None);
        assert_eq!(command, Some(GestureCommand::Steer(Direction::Up)));
    }

    #[test]
    fn test_mirroring_flips_horizontal_steering() {
        let mut interpreter = GestureInterpreter::new(GestureConfig::default());
        let hand = pointing_at(Point::new(0.2, 0.5));

        let command = interpreter.interpret(Some(&hand), Some(CENTER));
        assert_eq!(command, Some(GestureCommand::Steer(Direction::Right)));
    }

    #[test]
    fn test_tremor_inside_dead_zone_is_ignored() {
        let mut interpreter = interpreter();

        for offset in [0.01, -0.02, 0.015, -0.01] {
            let hand = pointing_at(Point::new(0.5 + offset, 0.5 - offset));
            assert_eq!(interpreter.interpret(Some(&hand), Some(CENTER)), None);
        }
    }

    #[test]
    fn test_held_fist_toggles_pause_once() {
        let mut interpreter = interpreter();
        let closed = fist(CENTER);

        let toggles = (0..30)
            .filter_map(|_| interpreter.interpret(Some(&closed), Some(CENTER)))
            .filter(|command| *command == GestureCommand::TogglePause)
            .count();

        assert_eq!(toggles, 1);
    }

    #[test]
    fn test_no_steering_while_fist_held() {
        let mut interpreter = interpreter();
        let closed = fist(Point::new(0.9, 0.5));

        assert_eq!(
            interpreter.interpret(Some(&closed), Some(CENTER)),
            Some(GestureCommand::TogglePause)
        );
        assert_eq!(interpreter.interpret(Some(&closed), Some(CENTER)), None);
    }

    #[test]
    fn test_smoothing_lags_behind_jumps() {
        let mut interpreter = interpreter();
        let right = pointing_at(Point::new(0.8, 0.5));
        let left = pointing_at(Point::new(0.2, 0.5));

        interpreter.interpret(Some(&right), Some(CENTER));
        // One frame on the left only pulls the average part of the way
        let command = interpreter.interpret(Some(&left), Some(CENTER));
        assert_eq!(command, Some(GestureCommand::Steer(Direction::Right)));

        let smoothed = interpreter.state().smoothed_position().expect("tracking");
        assert!(smoothed.x < 0.8 && smoothed.x > 0.5);
    }

    #[test]
    fn test_short_dropout_keeps_history() {
        let mut interpreter = interpreter();
        let hand = pointing_at(Point::new(0.8, 0.5));
        interpreter.interpret(Some(&hand), Some(CENTER));

        for _ in 0..15 {
            assert_eq!(interpreter.interpret(None, Some(CENTER)), None);
        }
        assert!(interpreter.state().is_tracking());
        assert_eq!(interpreter.state().missing_frames(), 15);
    }

    #[test]
    fn test_long_dropout_reinitializes_position() {
        let mut interpreter = interpreter();
        let old = pointing_at(Point::new(0.8, 0.5));
        interpreter.interpret(Some(&old), Some(CENTER));

        for _ in 0..16 {
            interpreter.interpret(None, Some(CENTER));
        }
        assert!(!interpreter.state().is_tracking());

        let new = pointing_at(Point::new(0.2, 0.3));
        let command = interpreter.interpret(Some(&new), Some(CENTER));

        let smoothed = interpreter.state().smoothed_position().expect("tracking");
        assert!((smoothed.x - 0.2).abs() < 1e-5);
        assert!((smoothed.y - 0.3).abs() < 1e-5);
        assert_eq!(command, Some(GestureCommand::Steer(Direction::Left)));
        assert_eq!(interpreter.state().missing_frames(), 0);
    }

    #[test]
    fn test_long_dropout_rearms_fist() {
        let mut interpreter = interpreter();
        let closed = fist(CENTER);

        assert_eq!(
            interpreter.interpret(Some(&closed), None),
            Some(GestureCommand::TogglePause)
        );
        for _ in 0..20 {
            interpreter.interpret(None, None);
        }
        assert_eq!(interpreter.state().pose(), HandPose::Open);
        assert_eq!(
            interpreter.interpret(Some(&closed), None),
            Some(GestureCommand::TogglePause)
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(GestureConfig::default().validate().is_ok());

        let config = GestureConfig {
            smoothing_alpha: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GestureConfig {
            smoothing_alpha: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GestureConfig {
            fist_closed_ratio: 0.9,
            fist_open_ratio: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GestureConfig {
            dead_zone: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
