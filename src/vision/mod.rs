//! Camera and hand-tracker collaborators.
//!
//! The game never decodes images or runs a hand model itself. It talks to a
//! [`FrameSource`] that yields frames and a [`LandmarkProvider`] that turns a
//! frame into at most one hand. Capture runs on its own worker and hands the
//! newest result to the play loop through a [`LatestSlot`].

pub mod capture;
pub mod slot;
pub mod tracker;

use crate::error::VisionError;
use crate::gesture::HandLandmarks;

pub use capture::{Capture, CaptureHandle, CaptureWorker};
pub use slot::LatestSlot;
pub use tracker::{CaptureConfig, TrackerFrame, TrackerProcess, TrackerProvider};

/// Called from another thread to make a blocked [`FrameSource::next_frame`] return
pub type Interrupt = Box<dyn FnOnce() + Send>;

/// Yields camera frames, blocking until the next one is ready
pub trait FrameSource {
    type Frame;

    /// Fails with [`VisionError::CameraUnavailable`] when no more frames can be produced
    fn next_frame(&mut self) -> Result<Self::Frame, VisionError>;

    /// A way to unblock `next_frame` from outside, for sources that can stall
    fn interrupt(&self) -> Option<Interrupt> {
        None
    }
}

/// Locates a single hand in a frame
pub trait LandmarkProvider {
    type Frame;

    /// `None` when no usable hand is in the frame
    fn detect(&mut self, frame: &Self::Frame) -> Option<HandLandmarks>;
}
