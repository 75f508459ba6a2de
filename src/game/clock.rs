use std::time::Duration;

/// Most ticks a single frame may trigger; a long stall is dropped, not replayed
const MAX_CATCH_UP_TICKS: u32 = 4;

/// Converts frame time into game ticks.
///
/// Frames arrive at the render rate while the game advances at its own,
/// speed-dependent rate. Elapsed time accumulates here and is drained one
/// tick interval at a time.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    accumulated: Duration,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add elapsed frame time
    pub fn advance(&mut self, elapsed: Duration) {
        self.accumulated += elapsed;
    }

    /// Consume one tick if enough time has accumulated for `interval`
    pub fn try_tick(&mut self, interval: Duration) -> bool {
        if interval.is_zero() || self.accumulated < interval {
            return false;
        }
        self.accumulated -= interval;
        true
    }

    /// Drain due ticks, calling `tick` for each.
    ///
    /// `tick` returns the interval for the next tick, so a speed-up takes
    /// effect immediately. Stops early when `tick` returns `None`.
    pub fn drain<F>(&mut self, mut interval: Duration, mut tick: F) -> u32
    where
        F: FnMut() -> Option<Duration>,
    {
        let mut ticks = 0;

        while ticks < MAX_CATCH_UP_TICKS && self.try_tick(interval) {
            ticks += 1;
            match tick() {
                Some(next) => interval = next,
                None => {
                    self.reset();
                    return ticks;
                }
            }
        }

        if ticks == MAX_CATCH_UP_TICKS {
            // Keep at most one pending interval after a stall
            self.accumulated = self.accumulated.min(interval);
        }

        ticks
    }

    /// Forget accumulated time (e.g. on pause or round start)
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }
}
