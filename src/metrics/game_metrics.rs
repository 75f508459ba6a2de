use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Span of the rolling window used for the capture rate
const RATE_WINDOW: Duration = Duration::from_secs(1);

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub rounds_played: u32,
    /// (time, total frames captured) samples inside the rate window
    capture_samples: VecDeque<(Instant, u64)>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            rounds_played: 0,
            capture_samples: VecDeque::new(),
        }
    }

    /// Refresh the round clock; only counts while the round is being played
    pub fn update(&mut self, running: bool) {
        if running {
            self.elapsed_time = self.start_time.elapsed();
        } else if let Some(start) = Instant::now().checked_sub(self.elapsed_time) {
            // Hold the clock still by sliding the start forward
            self.start_time = start;
        }
    }

    pub fn on_round_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_round_over(&mut self) {
        self.rounds_played += 1;
    }

    /// Record the capture thread's running frame count
    pub fn record_capture(&mut self, total_frames: u64, now: Instant) {
        self.capture_samples.push_back((now, total_frames));

        while let Some(&(oldest, _)) = self.capture_samples.front() {
            if now.duration_since(oldest) > RATE_WINDOW && self.capture_samples.len() > 2 {
                self.capture_samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Frames per second delivered by the capture thread
    pub fn capture_rate(&self) -> f64 {
        let (Some(&(first_at, first)), Some(&(last_at, last))) =
            (self.capture_samples.front(), self.capture_samples.back())
        else {
            return 0.0;
        };

        let span = last_at.duration_since(first_at).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (last - first) as f64 / span
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
