use super::landmarks::HandLandmarks;

/// Open/closed classification of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandPose {
    #[default]
    Open,
    Closed,
}

/// Tracks whether the hand is a fist and reports each new fist once.
///
/// Each fingertip's distance to the palm centre is divided by the palm size,
/// so the thresholds do not depend on how far the hand is from the camera.
/// A hand closes when every fingertip ratio is below `closed_ratio` and
/// opens again only once some ratio exceeds `open_ratio`.
#[derive(Debug, Clone, PartialEq)]
pub struct FistTracker {
    closed_ratio: f32,
    open_ratio: f32,
    pose: HandPose,
}

impl FistTracker {
    pub fn new(closed_ratio: f32, open_ratio: f32) -> Self {
        Self {
            closed_ratio,
            open_ratio,
            pose: HandPose::Open,
        }
    }

    pub fn pose(&self) -> HandPose {
        self.pose
    }

    /// Update with a new hand. Returns true on the open -> closed edge only.
    pub fn update(&mut self, hand: &HandLandmarks) -> bool {
        let previous = self.pose;
        self.pose = self.classify(hand);
        previous == HandPose::Open && self.pose == HandPose::Closed
    }

    pub fn reset(&mut self) {
        self.pose = HandPose::Open;
    }

    fn classify(&self, hand: &HandLandmarks) -> HandPose {
        let palm_size = hand.palm_size();
        if palm_size <= f32::EPSILON {
            return HandPose::Open;
        }

        let palm = hand.palm_center();
        let widest = hand
            .finger_tips()
            .iter()
            .map(|tip| tip.distance(palm) / palm_size)
            .fold(0.0f32, f32::max);

        if widest < self.closed_ratio {
            HandPose::Closed
        } else if widest > self.open_ratio {
            HandPose::Open
        } else {
            self.pose
        }
    }
}
