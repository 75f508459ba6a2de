//! Hand landmark types
//!
//! A hand is 21 points in normalized image coordinates (0.0 to 1.0 on both
//! axes, origin top-left), following the MediaPipe hand model numbering.

use crate::error::LandmarkError;

/// Number of landmarks in a full hand
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices used by the interpreter
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    /// Middle finger knuckle, used as the palm centre
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    /// Tips of the four non-thumb fingers
    pub const FINGER_TIPS: [usize; 4] = [INDEX_FINGER_TIP, MIDDLE_FINGER_TIP, RING_FINGER_TIP, PINKY_TIP];
}

/// A 2D point in normalized image space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Reflect horizontally, turning a camera image into a mirror image
    pub fn mirrored(&self) -> Self {
        Self::new(1.0 - self.x, self.y)
    }
}

/// One detected hand: exactly [`LANDMARK_COUNT`] finite points
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Point; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Landmark at `index`, `None` past the last one
    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Tips of the index, middle, ring and pinky fingers
    pub fn finger_tips(&self) -> [Point; 4] {
        index::FINGER_TIPS.map(|tip| self.points[tip])
    }

    /// The controlling fingertip
    pub fn index_tip(&self) -> Point {
        self.points[index::INDEX_FINGER_TIP]
    }

    pub fn palm_center(&self) -> Point {
        self.points[index::MIDDLE_FINGER_MCP]
    }

    /// Wrist to palm centre distance; scales the fist thresholds to hand size
    pub fn palm_size(&self) -> f32 {
        self.points[index::WRIST].distance(self.palm_center())
    }
}

impl TryFrom<Vec<Point>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }

        let actual = points.len();
        let points: [Point; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                actual,
            })?;

        Ok(Self { points })
    }
}
