//! Gesture-controlled play
//!
//! One loop drives everything: each frame it takes the newest hand from the
//! capture thread, interprets it, applies the resulting command, advances the
//! game by however many ticks are due, and redraws.
//!
//! # Controls
//!
//! - Index finger: steer towards it
//! - Fist: pause/resume
//! - Space/Enter: start or restart
//! - Arrows/WASD: steer from the keyboard
//! - P: pause/resume
//! - Q/Esc/Ctrl+C: quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::config::Config;
use crate::game::{Command, GameSession, Position, Status, TickClock};
use crate::gesture::{GestureCommand, GestureInterpreter, HandPose, Point};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{HandStatus, Renderer};
use crate::vision::{Capture, CaptureHandle, CaptureWorker, TrackerProcess, TrackerProvider};

/// Render and capture-poll rate: 30 FPS
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct PlayMode {
    config: Config,
    session: GameSession,
    interpreter: GestureInterpreter,
    clock: TickClock,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    capture: Option<CaptureHandle>,
    hand: HandStatus,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let session = match seed {
            Some(seed) => GameSession::seeded(config.game.clone(), seed),
            None => GameSession::new(config.game.clone()),
        };

        Self {
            interpreter: GestureInterpreter::new(config.gesture.clone()),
            config,
            session,
            clock: TickClock::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            capture: None,
            hand: HandStatus::Keyboard,
            should_quit: false,
        }
    }

    /// Attach a running capture; hand input is read from it every frame
    pub fn with_capture(mut self, capture: CaptureHandle) -> Self {
        self.capture = Some(capture);
        self.hand = HandStatus::Searching;
        self
    }

    /// Launch the configured hand tracker, if any
    pub fn start_capture(&mut self) -> Result<()> {
        let Some(program) = self.config.capture.tracker_program.as_deref() else {
            info!("No hand tracker configured, keyboard control only");
            return Ok(());
        };

        let source = TrackerProcess::spawn(program, &self.config.capture.tracker_args)
            .context("Failed to start hand tracker")?;
        let provider = TrackerProvider::new(self.config.capture.min_confidence);
        let handle = CaptureWorker::new(source, provider)
            .spawn()
            .context("Failed to start capture thread")?;

        self.capture = Some(handle);
        self.hand = HandStatus::Searching;
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        self.start_capture()?;

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Hand the terminal back first so a slow tracker cannot leave it raw
        let cleanup = self.cleanup_terminal(&mut terminal);
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
        cleanup?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Hand input, game ticks and drawing
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    self.on_frame(now.duration_since(last_frame))?;
                    last_frame = now;

                    let snapshot = self.session.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, self.hand);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => self.should_quit = true,
                action => {
                    if let Some(command) = action.command(self.session.status()) {
                        self.apply(command);
                    }
                }
            }
        }
    }

    /// One frame: read the hand, apply gestures, run due ticks
    fn on_frame(&mut self, elapsed: Duration) -> Result<()> {
        self.poll_capture()?;

        if self.session.status() == Status::Running {
            self.clock.advance(elapsed);
        } else {
            self.clock.reset();
        }

        let before = self.session.status();
        let session = &mut self.session;
        self.clock.drain(session.tick_interval(), || {
            session.tick(None);
            (session.status() == Status::Running).then(|| session.tick_interval())
        });

        if !before.is_finished() && self.session.status().is_finished() {
            self.metrics.on_round_over();
        }
        self.metrics.update(self.session.status() == Status::Running);

        Ok(())
    }

    fn poll_capture(&mut self) -> Result<()> {
        let Some(capture) = &self.capture else {
            return Ok(());
        };

        self.metrics.record_capture(capture.frames(), Instant::now());

        let hand = match capture.latest() {
            None => return Ok(()),
            Some(Capture::Lost(e)) => return Err(e).context("Lost the camera"),
            Some(Capture::Frame(hand)) => hand,
        };

        let anchor = self.anchor();
        let command = self.interpreter.interpret(hand.as_ref(), anchor);

        let state = self.interpreter.state();
        self.hand = if hand.is_some() {
            HandStatus::Tracking {
                pointer: state.smoothed_position().map(|point| self.grid_cell(point)),
                fist: state.pose() == HandPose::Closed,
            }
        } else {
            HandStatus::Searching
        };

        match command {
            Some(GestureCommand::Steer(direction)) => self.apply(Command::Move(direction)),
            Some(GestureCommand::TogglePause) => self.apply(Command::Pause),
            None => {}
        }

        Ok(())
    }

    fn apply(&mut self, command: Command) {
        let before = self.session.status();
        self.session.handle(command);
        let after = self.session.status();

        match (before, after) {
            (Status::NotStarted | Status::GameOver | Status::Won, Status::Running) => {
                self.metrics.on_round_start();
                self.clock.reset();
            }
            // A round can be won the moment it starts on a board with no room for food
            (Status::NotStarted | Status::GameOver | Status::Won, Status::Won) => {
                self.metrics.on_round_over();
            }
            _ => {}
        }
    }

    /// Centre of the snake head in normalized image space
    fn anchor(&self) -> Option<Point> {
        if !matches!(self.session.status(), Status::Running | Status::Paused) {
            return None;
        }

        let config = self.session.config();
        let head = self.session.snake().head();
        Some(Point::new(
            (head.x as f32 + 0.5) / config.grid_width as f32,
            (head.y as f32 + 0.5) / config.grid_height as f32,
        ))
    }

    /// Grid cell under a normalized point
    fn grid_cell(&self, point: Point) -> Position {
        let config = self.session.config();
        let to_cell = |v: f32, cells: usize| {
            ((v * cells as f32).floor() as i32).clamp(0, cells as i32 - 1)
        };
        Position::new(
            to_cell(point.x, config.grid_width),
            to_cell(point.y, config.grid_height),
        )
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
