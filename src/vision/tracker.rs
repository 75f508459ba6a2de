//! Hand tracking through an external tracker process
//!
//! The tracker owns the webcam and the hand-landmark model. It prints one
//! JSON record per captured frame on stdout:
//!
//! ```text
//! {"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":0.41,"y":0.52,"z":-0.01}, ...]}]}
//! ```
//!
//! An optional `"error"` string reports a per-frame failure. A line reading
//! `READY` may precede the first record. End of output means the camera is gone.

use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::{FrameSource, Interrupt, LandmarkProvider};
use crate::error::{ConfigError, VisionError};
use crate::gesture::{HandLandmarks, Point};

/// How to reach the hand tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Tracker executable; gesture control is off when unset
    pub tracker_program: Option<String>,
    pub tracker_args: Vec<String>,
    /// Hands reported below this confidence are treated as absent
    pub min_confidence: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tracker_program: None,
            tracker_args: Vec::new(),
            min_confidence: 0.7,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::invalid(
                "capture.min_confidence",
                format!("must be in [0, 1], got {}", self.min_confidence),
            ));
        }
        if matches!(&self.tracker_program, Some(program) if program.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "capture.tracker_program",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// One raw record from the tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerFrame(pub String);

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default = "full_confidence")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

fn full_confidence() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct DetectionRecord {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// A running tracker process, read one frame at a time
pub struct TrackerProcess {
    /// Shared so a stalled read can be broken by killing the tracker
    child: Arc<Mutex<Child>>,
    stdout: BufReader<ChildStdout>,
    frames: u64,
}

impl TrackerProcess {
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, VisionError> {
        info!(program, ?args, "Starting hand tracker");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                VisionError::CameraUnavailable(format!("failed to start tracker {program}: {e}"))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VisionError::Protocol("tracker stdout not captured".to_string()))?;

        Ok(Self {
            child: Arc::new(Mutex::new(child)),
            stdout: BufReader::new(stdout),
            frames: 0,
        })
    }

    /// Frames read so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn kill(child: &Mutex<Child>) {
    let mut child = child.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Err(e) = child.kill() {
        debug!("Tracker already exited: {}", e);
    }
}

impl FrameSource for TrackerProcess {
    type Frame = TrackerFrame;

    fn next_frame(&mut self) -> Result<TrackerFrame, VisionError> {
        let mut line = String::new();

        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(VisionError::CameraUnavailable(
                    "hand tracker stopped producing frames".to_string(),
                ));
            }

            let record = line.trim();
            if record.is_empty() {
                continue;
            }
            if record == "READY" {
                info!("Hand tracker ready");
                continue;
            }

            self.frames += 1;
            return Ok(TrackerFrame(record.to_string()));
        }
    }

    /// Kills the tracker; the pending read then sees end of output
    fn interrupt(&self) -> Option<Interrupt> {
        let child = Arc::clone(&self.child);
        Some(Box::new(move || kill(&child)))
    }
}

impl Drop for TrackerProcess {
    fn drop(&mut self) {
        // The tracker holds the camera; make sure it is released
        kill(&self.child);
        let mut child = self.child.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = child.wait();
    }
}

/// Parses tracker records into hands
pub struct TrackerProvider {
    min_confidence: f32,
}

impl TrackerProvider {
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }
}

impl LandmarkProvider for TrackerProvider {
    type Frame = TrackerFrame;

    fn detect(&mut self, frame: &TrackerFrame) -> Option<HandLandmarks> {
        let record: DetectionRecord = match serde_json::from_str(&frame.0) {
            Ok(record) => record,
            Err(e) => {
                debug!("Dropping unparsable tracker record: {}", e);
                return None;
            }
        };

        if let Some(error) = record.error {
            warn!("Hand tracker error: {}", error);
            return None;
        }

        // Single-hand game: first confident hand only
        let hand = record
            .hands
            .into_iter()
            .find(|hand| hand.score >= self.min_confidence)?;

        let points: Vec<Point> = hand
            .landmarks
            .iter()
            .map(|lm| Point::new(lm.x, lm.y))
            .collect();

        match HandLandmarks::try_from(points) {
            Ok(landmarks) => Some(landmarks),
            Err(e) => {
                debug!(handedness = ?hand.handedness, "Dropping malformed hand: {}", e);
                None
            }
        }
    }
}
