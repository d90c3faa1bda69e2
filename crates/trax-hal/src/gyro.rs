//! Single-axis orientation sensor abstraction.

/// A yaw-only gyro.
///
/// Readings are degrees, wrapped by the device into `(-180.0, 180.0]`,
/// positive counter-clockwise. Consumers that need an unbounded heading
/// accumulate wrapped deltas themselves.
pub trait Gyro {
    /// `true` once the sensor has finished its calibration sequence.
    fn is_calibrated(&self) -> bool;

    /// Current raw yaw reading in degrees.
    fn heading(&self) -> f64;
}
