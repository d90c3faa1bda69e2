//! Drive motor channel abstraction.
//!
//! A channel is one logical actuator with a built-in encoder. The controller
//! drives four of them, paired into left and right sides.

/// Run mode of a drive motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Closed-loop velocity control: `set_power` commands a signed fraction of
    /// full speed and the channel holds it.
    Velocity,
    /// Closed-loop position control: the channel runs toward its target
    /// position at up to the commanded power magnitude.
    Position,
}

/// One motor channel with an incremental encoder.
///
/// Positions and targets are raw encoder counts. Power is a signed fraction in
/// `[-1.0, 1.0]`; implementations clamp out-of-range commands rather than
/// fail. All methods are infallible: transport faults are an implementation
/// concern and never surface through this interface.
pub trait DriveMotor {
    /// Current encoder position in counts.
    fn position(&self) -> i32;

    /// Target position in counts. Only meaningful in [`RunMode::Position`].
    fn target(&self) -> i32;

    /// Sets the target position in counts.
    fn set_target(&mut self, counts: i32);

    /// Last commanded power.
    fn power(&self) -> f64;

    /// Commands a power in `[-1.0, 1.0]`.
    fn set_power(&mut self, power: f64);

    /// Current run mode.
    fn mode(&self) -> RunMode;

    /// Switches the run mode.
    fn set_mode(&mut self, mode: RunMode);

    /// `true` while the channel is still moving toward its target in
    /// [`RunMode::Position`].
    fn is_busy(&self) -> bool;
}
