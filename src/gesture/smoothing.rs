use super::landmarks::Point;

/// Exponential moving average over fingertip positions.
///
/// `alpha` weights the newest sample: 1.0 follows the raw input exactly,
/// smaller values trade responsiveness for less jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Smoother {
    alpha: f32,
    value: Option<Point>,
}

impl Smoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, value: None }
    }

    /// Feed a raw sample and return the smoothed position
    pub fn update(&mut self, raw: Point) -> Point {
        let next = match self.value {
            // First sample after a reset has no history to blend with
            None => raw,
            Some(prev) => Point::new(
                self.alpha * raw.x + (1.0 - self.alpha) * prev.x,
                self.alpha * raw.y + (1.0 - self.alpha) * prev.y,
            ),
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<Point> {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
