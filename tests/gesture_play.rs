//! End-to-end tests: tracker records through the interpreter into a session
//!
//! These tests verify that:
//! - A pointed fingertip steers the snake
//! - A held fist pauses exactly once
//! - A hand returning after a long absence is not averaged with stale data
//! - Unusable tracker records count as "no hand"

use gesture_snake::game::{Command, Direction, GameConfig, GameSession, Position, Status};
use gesture_snake::gesture::{GestureCommand, GestureConfig, GestureInterpreter, Point};
use gesture_snake::vision::{LandmarkProvider, TrackerFrame, TrackerProvider};

/// Test harness shared by the scenarios
mod harness {
    use super::*;

    /// A tracker record for an open hand whose index fingertip is at `tip`
    pub fn pointing_record(tip: Point, score: f32) -> TrackerFrame {
        let palm = Point::new(tip.x + 0.03, tip.y + 0.12);
        let mut points = vec![palm; 21];
        points[0] = Point::new(palm.x, palm.y + 0.10);
        points[4] = Point::new(palm.x - 0.08, palm.y - 0.02);
        points[8] = tip;
        points[12] = Point::new(palm.x, palm.y - 0.13);
        points[16] = Point::new(palm.x + 0.03, palm.y - 0.12);
        points[20] = Point::new(palm.x + 0.06, palm.y - 0.09);
        record(&points, score)
    }

    /// A tracker record for a closed fist centred on `center`
    pub fn fist_record(center: Point) -> TrackerFrame {
        let mut points = vec![center; 21];
        points[0] = Point::new(center.x, center.y + 0.10);
        for (i, tip) in [8, 12, 16, 20].into_iter().enumerate() {
            points[tip] = Point::new(center.x - 0.03 + 0.02 * i as f32, center.y + 0.02);
        }
        record(&points, 0.95)
    }

    pub fn empty_record() -> TrackerFrame {
        TrackerFrame(r#"{"hands":[],"error":null}"#.to_string())
    }

    fn record(points: &[Point], score: f32) -> TrackerFrame {
        let landmarks: Vec<String> = points
            .iter()
            .map(|p| format!(r#"{{"x":{},"y":{},"z":0.0}}"#, p.x, p.y))
            .collect();
        TrackerFrame(format!(
            r#"{{"hands":[{{"handedness":"Right","score":{},"landmarks":[{}]}}],"error":null}}"#,
            score,
            landmarks.join(",")
        ))
    }

    /// Provider, interpreter and session wired the way the play loop wires them
    pub struct Rig {
        pub provider: TrackerProvider,
        pub interpreter: GestureInterpreter,
        pub session: GameSession,
    }

    impl Rig {
        pub fn new() -> Self {
            Self {
                provider: TrackerProvider::new(0.7),
                interpreter: GestureInterpreter::new(GestureConfig {
                    mirror_x: false,
                    ..Default::default()
                }),
                session: GameSession::seeded(GameConfig::small(), 11),
            }
        }

        /// Feed one tracker record and apply whatever it asks for
        pub fn frame(&mut self, record: &TrackerFrame) -> Option<GestureCommand> {
            let hand = self.provider.detect(record);
            let command = self.interpreter.interpret(hand.as_ref(), None);

            match command {
                Some(GestureCommand::Steer(direction)) => {
                    self.session.handle(Command::Move(direction))
                }
                Some(GestureCommand::TogglePause) => self.session.handle(Command::Pause),
                None => {}
            }
            command
        }
    }
}

use harness::*;

#[test]
fn test_start_and_first_tick() {
    let mut session = GameSession::seeded(GameConfig::small(), 5);

    let snapshot = session.tick(Some(Command::Start));
    assert_eq!(snapshot.status, Status::Running);
    assert_eq!(
        snapshot.snake,
        vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]
    );
    let food = snapshot.food.expect("food placed");
    assert!(!snapshot.snake.contains(&food));

    let snapshot = session.tick(None);
    assert_eq!(snapshot.head(), Some(Position::new(6, 5)));
    if food == Position::new(6, 5) {
        assert_eq!(snapshot.snake.len(), 4);
        assert_eq!(snapshot.score, 10);
    } else {
        assert_eq!(snapshot.snake.len(), 3);
        assert!(!snapshot.is_snake(Position::new(3, 5)));
        assert_eq!(snapshot.score, 0);
    }
}

#[test]
fn test_pointing_steers_snake() {
    let mut rig = Rig::new();
    rig.session.handle(Command::Start);

    let command = rig.frame(&pointing_record(Point::new(0.5, 0.1), 0.9));
    assert_eq!(command, Some(GestureCommand::Steer(Direction::Up)));

    let snapshot = rig.session.tick(None);
    assert_eq!(snapshot.head(), Some(Position::new(5, 4)));
    assert_eq!(snapshot.direction, Direction::Up);
}

#[test]
fn test_reverse_gesture_is_ignored() {
    let mut rig = Rig::new();
    rig.session.handle(Command::Start);

    // Moving right; pointing left must not reverse the snake
    rig.frame(&pointing_record(Point::new(0.1, 0.5), 0.9));
    assert_eq!(rig.session.pending_direction(), Direction::Right);
}

#[test]
fn test_held_fist_pauses_once() {
    let mut rig = Rig::new();
    rig.session.handle(Command::Start);
    let fist = fist_record(Point::new(0.5, 0.5));

    let toggles = (0..30)
        .filter(|_| rig.frame(&fist) == Some(GestureCommand::TogglePause))
        .count();

    assert_eq!(toggles, 1);
    assert_eq!(rig.session.status(), Status::Paused);

    // Paused sessions do not move
    let head = rig.session.snake().head();
    rig.session.tick(None);
    assert_eq!(rig.session.snake().head(), head);
}

#[test]
fn test_open_and_close_again_resumes() {
    let mut rig = Rig::new();
    rig.session.handle(Command::Start);
    let fist = fist_record(Point::new(0.5, 0.5));
    let open = pointing_record(Point::new(0.52, 0.5), 0.9);

    rig.frame(&fist);
    assert_eq!(rig.session.status(), Status::Paused);

    rig.frame(&open);
    rig.frame(&fist);
    assert_eq!(rig.session.status(), Status::Running);
}

#[test]
fn test_hand_reappearing_reinitializes_position() {
    let mut rig = Rig::new();
    rig.frame(&pointing_record(Point::new(0.9, 0.5), 0.9));

    for _ in 0..20 {
        assert_eq!(rig.frame(&empty_record()), None);
    }
    assert!(!rig.interpreter.state().is_tracking());

    rig.frame(&pointing_record(Point::new(0.2, 0.4), 0.9));
    let smoothed = rig.interpreter.state().smoothed_position().expect("tracking");
    assert!((smoothed.x - 0.2).abs() < 1e-5);
    assert!((smoothed.y - 0.4).abs() < 1e-5);
}

#[test]
fn test_unusable_records_count_as_no_hand() {
    let mut rig = Rig::new();

    let low_confidence = pointing_record(Point::new(0.9, 0.5), 0.3);
    let garbage = TrackerFrame("not json".to_string());
    let reported = TrackerFrame(r#"{"hands":[],"error":"camera busy"}"#.to_string());

    for record in [&low_confidence, &garbage, &reported] {
        assert_eq!(rig.frame(record), None);
    }
    assert_eq!(rig.interpreter.state().missing_frames(), 3);
    assert!(!rig.interpreter.state().is_tracking());
}

#[test]
fn test_gestures_before_start_are_ignored() {
    let mut rig = Rig::new();

    rig.frame(&pointing_record(Point::new(0.5, 0.9), 0.9));
    rig.frame(&fist_record(Point::new(0.5, 0.5)));

    assert_eq!(rig.session.status(), Status::NotStarted);
    assert_eq!(rig.session.pending_direction(), Direction::Right);
}
