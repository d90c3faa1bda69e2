#![warn(missing_docs)]

//! Error types for the drivetrain controller.
//!
//! Configuration problems are the only recoverable failure here. Contract
//! violations on the motion commands (non-positive timeout or precision) are
//! programming errors and assert instead, and timeout exhaustion is an
//! expected outcome reported through the boolean command results.

use core::fmt;

/// Errors raised while validating a [`DriveConfig`](crate::DriveConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum DriveError {
    /// Error for an invalid encoder resolution.
    /// This variant is returned when counts-per-revolution is zero.
    InvalidCountsPerRev(&'static str),
    /// Error for an invalid wheel diameter.
    /// This variant is returned when the wheel diameter is not positive.
    InvalidWheelDiameter(&'static str),
    /// Error for an invalid drive speed cap.
    /// This variant is returned when the speed cap is outside `(0, 1]`.
    InvalidMaxDriveSpeed(&'static str),
    /// Error for an invalid joystick deadband.
    /// This variant is returned when the deadband is outside `[0, 1)`.
    InvalidDeadband(&'static str),
    /// Error for an invalid proportional gain.
    /// This variant is returned when a gain is not positive.
    InvalidGain(&'static str),
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::InvalidCountsPerRev(msg) => write!(f, "Invalid counts per rev: {}", msg),
            DriveError::InvalidWheelDiameter(msg) => write!(f, "Invalid wheel diameter: {}", msg),
            DriveError::InvalidMaxDriveSpeed(msg) => write!(f, "Invalid max drive speed: {}", msg),
            DriveError::InvalidDeadband(msg) => write!(f, "Invalid deadband: {}", msg),
            DriveError::InvalidGain(msg) => write!(f, "Invalid gain: {}", msg),
        }
    }
}

impl core::error::Error for DriveError {}
