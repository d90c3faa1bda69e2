//! Accumulated heading tracking over a wrapped gyro.
//!
//! The raw sensor wraps its yaw into `(-180, 180]`, so consecutive readings
//! jump when the robot crosses the boundary. The tracker turns those wrapped
//! readings into a continuous, unbounded heading by accumulating per-sample
//! deltas, which lets the controller measure total rotation beyond a single
//! revolution.

/// Signed cumulative heading built from wrapped raw yaw readings.
///
/// Positive is to the left (counter-clockwise). Owned by the drivetrain
/// controller; reset at initialization and around every turn or directional
/// drive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadingTracker {
    accumulated: f64,
    last_raw: f64,
}

impl HeadingTracker {
    /// Creates a tracker with a zero accumulator and baseline.
    pub const fn new() -> Self {
        HeadingTracker {
            accumulated: 0.0,
            last_raw: 0.0,
        }
    }

    /// Zeroes the accumulator and captures `raw` as the new baseline.
    pub fn reset(&mut self, raw: f64) {
        self.accumulated = 0.0;
        self.last_raw = raw;
    }

    /// Folds one raw reading into the accumulator and returns the accumulated
    /// heading.
    ///
    /// The delta from the previous reading is normalized into `(-180, 180]`
    /// by adding or subtracting 360 once if it overshoots, so a boundary
    /// crossing like `170 -> -175` accumulates the short way (+15 degrees).
    ///
    /// # Arguments
    ///
    /// * `raw`: The current wrapped yaw reading in degrees.
    ///
    /// # Returns
    ///
    /// The accumulated (unbounded) heading in degrees.
    pub fn sample(&mut self, raw: f64) -> f64 {
        let mut delta = raw - self.last_raw;
        if delta < -180.0 {
            delta += 360.0;
        } else if delta > 180.0 {
            delta -= 360.0;
        }
        self.accumulated += delta;
        self.last_raw = raw;
        self.accumulated
    }

    /// The accumulated heading without folding in a new reading.
    pub fn angle(&self) -> f64 {
        self.accumulated
    }
}
