use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::{FrameSource, Interrupt, LandmarkProvider, LatestSlot};

/// How long `stop` waits for the capture thread before leaving it behind
const STOP_GRACE: Duration = Duration::from_millis(500);
use crate::error::VisionError;
use crate::gesture::HandLandmarks;

/// Result of one capture iteration, as seen by the play loop
#[derive(Debug)]
pub enum Capture {
    /// A frame was processed; `None` when it held no usable hand
    Frame(Option<HandLandmarks>),
    /// The frame source failed and capture has stopped
    Lost(VisionError),
}

/// Runs frame acquisition and hand detection away from the render loop
pub struct CaptureWorker<S, P> {
    source: S,
    provider: P,
}

impl<S, P> CaptureWorker<S, P>
where
    S: FrameSource + Send + 'static,
    P: LandmarkProvider<Frame = S::Frame> + Send + 'static,
{
    pub fn new(source: S, provider: P) -> Self {
        Self { source, provider }
    }

    /// Run the capture loop on the calling thread until stopped or the source fails.
    ///
    /// The stop flag is checked once per frame. The source is dropped on return.
    pub fn run(mut self, slot: &LatestSlot<Capture>, stop: &AtomicBool) {
        while !stop.load(Ordering::SeqCst) {
            match self.source.next_frame() {
                Ok(frame) => {
                    let hand = self.provider.detect(&frame);
                    slot.put(Capture::Frame(hand));
                }
                Err(_) if stop.load(Ordering::SeqCst) => break,
                Err(e) => {
                    error!("Capture stopped: {}", e);
                    slot.put(Capture::Lost(e));
                    return;
                }
            }
        }

        info!("Capture stopped on request");
    }

    /// Start the capture loop on a dedicated thread
    pub fn spawn(self) -> std::io::Result<CaptureHandle> {
        let slot = LatestSlot::new();
        let stop = Arc::new(AtomicBool::new(false));
        let interrupt = self.source.interrupt();

        let thread = {
            let slot = slot.clone();
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("capture".to_string())
                .spawn(move || self.run(&slot, &stop))?
        };

        Ok(CaptureHandle {
            slot,
            stop,
            interrupt,
            thread: Some(thread),
        })
    }
}

/// Owner's side of a running capture thread
pub struct CaptureHandle {
    slot: LatestSlot<Capture>,
    stop: Arc<AtomicBool>,
    interrupt: Option<Interrupt>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureHandle {
    /// Handle over a slot filled by some other producer
    pub fn from_slot(slot: LatestSlot<Capture>) -> Self {
        Self {
            slot,
            stop: Arc::new(AtomicBool::new(false)),
            interrupt: None,
            thread: None,
        }
    }

    /// Newest capture result since the last call, if any
    pub fn latest(&self) -> Option<Capture> {
        self.slot.take()
    }

    /// Frames published so far
    pub fn frames(&self) -> u64 {
        self.slot.published()
    }

    /// Stop the capture thread, interrupting a blocked read.
    ///
    /// Waits at most [`STOP_GRACE`] for the thread to release the source; a
    /// thread still stuck after that is detached.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(interrupt) = self.interrupt.take() {
            interrupt();
        }

        let Some(thread) = self.thread.take() else {
            return;
        };

        let deadline = Instant::now() + STOP_GRACE;
        while !thread.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        if !thread.is_finished() {
            warn!("Capture thread did not stop in time, leaving it behind");
            return;
        }
        if thread.join().is_err() {
            error!("Capture thread panicked");
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Point, LANDMARK_COUNT};
    use std::collections::VecDeque;

    /// Replays a fixed list of frames, then reports the camera gone
    struct Scripted {
        frames: VecDeque<bool>,
    }

    impl FrameSource for Scripted {
        type Frame = bool;

        fn next_frame(&mut self) -> Result<bool, VisionError> {
            self.frames
                .pop_front()
                .ok_or_else(|| VisionError::CameraUnavailable("unplugged".into()))
        }
    }

    /// Sees a hand in every `true` frame
    struct Flag;

    impl LandmarkProvider for Flag {
        type Frame = bool;

        fn detect(&mut self, frame: &bool) -> Option<HandLandmarks> {
            frame.then(|| {
                HandLandmarks::try_from(vec![Point::new(0.5, 0.5); LANDMARK_COUNT])
                    .expect("valid hand")
            })
        }
    }

    #[test]
    fn test_run_publishes_frames_then_loss() {
        let worker = CaptureWorker::new(
            Scripted {
                frames: VecDeque::from([true, false, true]),
            },
            Flag,
        );
        let slot = LatestSlot::new();
        let stop = AtomicBool::new(false);

        worker.run(&slot, &stop);

        assert_eq!(slot.published(), 4);
        assert!(matches!(
            slot.take(),
            Some(Capture::Lost(VisionError::CameraUnavailable(_)))
        ));
    }

    #[test]
    fn test_stop_flag_halts_before_reading() {
        let worker = CaptureWorker::new(
            Scripted {
                frames: VecDeque::from([true]),
            },
            Flag,
        );
        let slot = LatestSlot::new();
        let stop = AtomicBool::new(true);

        worker.run(&slot, &stop);
        assert_eq!(slot.published(), 0);
    }

    #[test]
    fn test_spawned_worker_reports_loss() {
        let worker = CaptureWorker::new(
            Scripted {
                frames: VecDeque::new(),
            },
            Flag,
        );
        let mut handle = worker.spawn().expect("spawn capture thread");

        // Source is empty, so the thread exits right away
        if let Some(thread) = handle.thread.take() {
            thread.join().expect("capture thread");
        }
        assert!(matches!(handle.latest(), Some(Capture::Lost(_))));
        assert_eq!(handle.frames(), 1);
    }

    /// Blocks in `next_frame` until interrupted
    struct Stalled {
        released: Arc<AtomicBool>,
    }

    impl FrameSource for Stalled {
        type Frame = bool;

        fn next_frame(&mut self) -> Result<bool, VisionError> {
            while !self.released.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(1));
            }
            Err(VisionError::CameraUnavailable("interrupted".into()))
        }

        fn interrupt(&self) -> Option<Interrupt> {
            let released = Arc::clone(&self.released);
            Some(Box::new(move || released.store(true, Ordering::SeqCst)))
        }
    }

    #[test]
    fn test_stop_interrupts_blocked_source() {
        let released = Arc::new(AtomicBool::new(false));
        let worker = CaptureWorker::new(
            Stalled {
                released: Arc::clone(&released),
            },
            Flag,
        );
        let mut handle = worker.spawn().expect("spawn capture thread");
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        handle.stop();

        assert!(started.elapsed() < STOP_GRACE);
        assert!(released.load(Ordering::SeqCst));
        assert!(handle.thread.is_none());
        // A requested stop is not reported as a lost camera
        assert!(handle.latest().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_stop_with_silent_tracker() {
        use crate::vision::{TrackerProcess, TrackerProvider};

        let script = "echo '{\"hands\":[]}'; exec sleep 30".to_string();
        let source = TrackerProcess::spawn("sh", &["-c".to_string(), script]).expect("spawn sh");
        let mut handle = CaptureWorker::new(source, TrackerProvider::new(0.7))
            .spawn()
            .expect("spawn capture thread");
        thread::sleep(Duration::from_millis(200));

        let started = Instant::now();
        handle.stop();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!matches!(handle.latest(), Some(Capture::Lost(_))));
    }

    /// Never returns from `next_frame` and cannot be interrupted
    struct Wedged;

    impl FrameSource for Wedged {
        type Frame = bool;

        fn next_frame(&mut self) -> Result<bool, VisionError> {
            thread::sleep(Duration::from_secs(10));
            Err(VisionError::CameraUnavailable("wedged".into()))
        }
    }

    #[test]
    fn test_stop_gives_up_on_wedged_source() {
        let mut handle = CaptureWorker::new(Wedged, Flag)
            .spawn()
            .expect("spawn capture thread");

        let started = Instant::now();
        handle.stop();

        assert!(started.elapsed() < STOP_GRACE + Duration::from_secs(1));
    }
}
