#![cfg_attr(not(any(test, feature = "sim")), no_std)]
#![warn(missing_docs)]
#![doc = "Hardware abstraction traits for the trax drivetrain controller."]
#![doc = ""]
#![doc = "The control crate (`trax-drivetrain`) is written against the traits in this"]
#![doc = "crate only: a drive motor channel, a single-axis orientation sensor, the"]
#![doc = "cooperative session that owns cancellation and time, and a write-only"]
#![doc = "telemetry sink. Real hardware bindings and the host simulator both live"]
#![doc = "behind these traits, so the control loops never know which one they drive."]

pub mod gyro;
pub mod motor;
pub mod session;
pub mod telemetry;

#[cfg(feature = "sim")]
pub mod sim;

pub use gyro::Gyro;
pub use motor::{DriveMotor, RunMode};
pub use session::Session;
pub use telemetry::{NullTelemetry, Telemetry};
