#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "Closed-loop drive control for a four-wheel differential-drive robot."]
#![doc = ""]
#![doc = "The controller owns four motor channels paired into left and right sides and"]
#![doc = "a single-axis gyro, all injected through the `trax-hal` traits. It provides"]
#![doc = "distance-based straight driving with gyro-assisted heading correction,"]
#![doc = "in-place turns to an absolute heading, and arcade-style teleop shaping."]
#![doc = ""]
#![doc = "Everything runs on the caller's thread: the loops poll the session's"]
#![doc = "active flag for cancellation and report timeout exhaustion through their"]
#![doc = "boolean results. Contract violations (non-positive timeout or precision)"]
#![doc = "assert instead."]

use core::f64::consts::PI;
use core::time::Duration;

use libm::fabs;
use trax_hal::{DriveMotor, Gyro, RunMode, Session, Telemetry};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod heading;
pub mod shaping;

pub use error::DriveError;
pub use heading::HeadingTracker;
pub use shaping::{arcade_mix, bound_value, deadband};

/// Cooperative yield between turn-loop iterations, so the sensor is not
/// busy-polled.
const TURN_POLL: Duration = Duration::from_millis(50);

/// Fixed drivetrain parameters and gains.
///
/// The defaults describe a 4-inch wheel on a 1680 count/rev encoder with the
/// stock gains; [`DriveConfig::validate`] rejects configurations a loaded
/// settings file could get wrong.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveConfig {
    /// Encoder counts per wheel revolution.
    pub counts_per_rev: u32,
    /// Wheel diameter in inches.
    pub wheel_diameter: f64,
    /// Proportional gain for in-place turns (power per degree of error).
    pub turn_p: f64,
    /// Gain applied to the accumulated heading for straight-drive correction.
    pub heading_gain: f64,
    /// Cap applied to every commanded power magnitude.
    pub max_drive_speed: f64,
    /// Joystick deadband for arcade inputs.
    pub deadband: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            counts_per_rev: 1680,
            wheel_diameter: 4.0,
            turn_p: 0.5,
            heading_gain: 0.1,
            max_drive_speed: 0.9,
            deadband: 0.15,
        }
    }
}

impl DriveConfig {
    /// Checks the configuration for values no drivetrain can use.
    ///
    /// # Errors
    ///
    /// Returns the matching [`DriveError`] variant when counts-per-rev is
    /// zero, the wheel diameter or a gain is not positive, the speed cap is
    /// outside `(0, 1]`, or the deadband is outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), DriveError> {
        if self.counts_per_rev == 0 {
            return Err(DriveError::InvalidCountsPerRev("must be non-zero"));
        }
        if self.wheel_diameter <= 0.0 {
            return Err(DriveError::InvalidWheelDiameter("must be positive"));
        }
        if self.turn_p <= 0.0 || self.heading_gain <= 0.0 {
            return Err(DriveError::InvalidGain("must be positive"));
        }
        if self.max_drive_speed <= 0.0 || self.max_drive_speed > 1.0 {
            return Err(DriveError::InvalidMaxDriveSpeed("must be in (0, 1]"));
        }
        if self.deadband < 0.0 || self.deadband >= 1.0 {
            return Err(DriveError::InvalidDeadband("must be in [0, 1)"));
        }
        Ok(())
    }

    /// Encoder counts per inch of wheel travel.
    pub fn counts_per_inch(&self) -> f64 {
        f64::from(self.counts_per_rev) / (PI * self.wheel_diameter)
    }

    /// Converts a distance in inches to an encoder-count delta (truncating).
    pub fn distance_to_counts(&self, inches: f64) -> i32 {
        (self.counts_per_inch() * inches) as i32
    }
}

/// Clamps a turn target into the open interval `(-180, 180)`.
///
/// Values at or beyond the wrap boundary are pulled to ±179.9 degrees so the
/// turn error never straddles the heading-wrap discontinuity.
pub fn clamp_target_angle(target_deg: f64) -> f64 {
    if target_deg >= 180.0 {
        179.9
    } else if target_deg <= -180.0 {
        -179.9
    } else {
        target_deg
    }
}

/// The drivetrain controller.
///
/// Exclusively owns its four motor channels and the heading accumulator for
/// the lifetime of one operating session. Paired motors on the same side
/// always receive identical power commands.
#[derive(Debug)]
pub struct Drivetrain<M: DriveMotor, G: Gyro> {
    left_front: M,
    left_back: M,
    right_front: M,
    right_back: M,
    gyro: G,
    heading: HeadingTracker,
    config: DriveConfig,
}

impl<M: DriveMotor, G: Gyro> Drivetrain<M, G> {
    /// Binds the injected motor channels and gyro and captures the initial
    /// heading baseline.
    ///
    /// # Errors
    ///
    /// Returns a [`DriveError`] when `config` fails validation.
    pub fn new(
        config: DriveConfig,
        left_front: M,
        left_back: M,
        right_front: M,
        right_back: M,
        gyro: G,
    ) -> Result<Self, DriveError> {
        config.validate()?;
        let mut heading = HeadingTracker::new();
        heading.reset(gyro.heading());
        Ok(Drivetrain {
            left_front,
            left_back,
            right_front,
            right_back,
            gyro,
            heading,
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// The accumulated heading in degrees, without sampling the gyro.
    pub fn heading(&self) -> f64 {
        self.heading.angle()
    }

    /// Waits for the gyro to finish calibrating, polling every `poll`.
    ///
    /// Cancellable: returns as soon as the session goes inactive, calibrated
    /// or not. Progress is reported to the telemetry sink. On exit the
    /// heading accumulator is reset against the current reading.
    ///
    /// # Returns
    ///
    /// Whether the gyro reported calibrated.
    pub fn wait_for_calibration<S: Session, T: Telemetry>(
        &mut self,
        session: &mut S,
        telemetry: &mut T,
        poll: Duration,
    ) -> bool {
        telemetry.report("mode", "calibrating...");
        while session.is_active() && !self.gyro.is_calibrated() {
            session.sleep(poll);
        }
        let calibrated = self.gyro.is_calibrated();
        telemetry.report(
            "mode",
            if calibrated {
                "finished calibrating"
            } else {
                "calibration interrupted"
            },
        );
        self.heading.reset(self.gyro.heading());
        calibrated
    }

    /// Drives straight for `distance_in` inches, holding heading with the
    /// gyro.
    ///
    /// The count delta is added to each channel's *current* position, so
    /// unequal starting positions are preserved. All four channels run in
    /// position mode at the configured speed cap; the accumulated heading
    /// times `heading_gain` is added to the left side each iteration to steer
    /// back toward straight. The loop is a tight busy-poll (the motor busy
    /// check is assumed cheap).
    ///
    /// # Arguments
    ///
    /// * `session`: Execution context polled for cancellation and time.
    /// * `distance_in`: Signed distance in inches; negative drives backward.
    /// * `timeout`: Cooperative deadline, checked once per iteration.
    ///
    /// # Returns
    ///
    /// `true` once the motors report arrival; `false` on timeout or session
    /// cancellation. Motor powers are zero after return regardless of
    /// outcome.
    ///
    /// # Panics
    ///
    /// Panics when `timeout` is zero.
    pub fn drive_to_distance<S: Session>(
        &mut self,
        session: &mut S,
        distance_in: f64,
        timeout: Duration,
    ) -> bool {
        assert!(timeout > Duration::ZERO, "timeout must be positive");

        let delta = self.config.distance_to_counts(distance_in);
        let target = self.left_front.position() + delta;
        self.left_front.set_target(target);
        let target = self.left_back.position() + delta;
        self.left_back.set_target(target);
        let target = self.right_front.position() + delta;
        self.right_front.set_target(target);
        let target = self.right_back.position() + delta;
        self.right_back.set_target(target);

        self.set_mode_all(RunMode::Position);
        self.heading.reset(self.gyro.heading());

        let start = session.elapsed();
        let mut timed_out = false;
        loop {
            if !session.is_active() {
                break;
            }
            if session.elapsed().saturating_sub(start) >= timeout {
                timed_out = true;
                break;
            }
            if !self.all_busy() {
                break;
            }
            let correction = self.heading_correction();
            self.set_left_power(1.0, self.config.max_drive_speed, correction);
            self.set_right_power(1.0, self.config.max_drive_speed);
        }

        let arrived = !self.all_busy();
        self.stop();
        !timed_out && arrived
    }

    /// Turns in place to `target_deg` relative to the heading at entry.
    ///
    /// Positive is to the left (counter-clockwise). The target is clamped
    /// with [`clamp_target_angle`], the heading accumulator is reset, and the
    /// loop runs proportional control (`error * turn_p`, left at `+power`,
    /// right at `-power`, capped by the speed cap) until the signed error is
    /// inside `(-precision_deg, precision_deg)`, sleeping 50 ms between
    /// iterations.
    ///
    /// # Arguments
    ///
    /// * `session`: Execution context polled for cancellation and time.
    /// * `target_deg`: Absolute turn target in degrees.
    /// * `precision_deg`: Half-width of the acceptance band, degrees.
    /// * `timeout`: Cooperative deadline, checked once per iteration.
    ///
    /// # Returns
    ///
    /// `true` once the error is inside the acceptance band; `false` on
    /// timeout or session cancellation. Motor powers are zero after return
    /// regardless of outcome, and the heading accumulator is reset again on
    /// any non-timeout exit.
    ///
    /// # Panics
    ///
    /// Panics when `precision_deg` or `timeout` is not positive.
    pub fn turn_to_degree<S: Session>(
        &mut self,
        session: &mut S,
        target_deg: f64,
        precision_deg: f64,
        timeout: Duration,
    ) -> bool {
        assert!(precision_deg > 0.0, "precision must be positive");
        assert!(timeout > Duration::ZERO, "timeout must be positive");

        let target = clamp_target_angle(target_deg);
        self.set_mode_all(RunMode::Velocity);
        self.heading.reset(self.gyro.heading());

        let start = session.elapsed();
        let mut diff = self.heading.angle() - target;
        let mut timed_out = false;
        while fabs(diff) >= precision_deg {
            if !session.is_active() {
                break;
            }
            if session.elapsed().saturating_sub(start) >= timeout {
                timed_out = true;
                break;
            }
            let power = diff * self.config.turn_p;
            self.set_left_power(power, self.config.max_drive_speed, 0.0);
            self.set_right_power(-power, self.config.max_drive_speed);
            session.sleep(TURN_POLL);
            diff = self.heading.sample(self.gyro.heading()) - target;
        }

        self.stop();
        if timed_out {
            return false;
        }
        self.heading.reset(self.gyro.heading());
        fabs(diff) < precision_deg
    }

    /// Applies one arcade-style teleop command: clamp, deadband, mix, scale,
    /// actuate. No heading correction and no loop; this is the manual path.
    ///
    /// # Arguments
    ///
    /// * `forward`: Forward/backward input in `[-1.0, 1.0]`.
    /// * `turn`: Turn input in `[-1.0, 1.0]`, positive to the left.
    pub fn arcade_drive(&mut self, forward: f64, turn: f64) {
        let forward = deadband(bound_value(forward), self.config.deadband);
        let turn = deadband(bound_value(turn), self.config.deadband);

        let (left, right) = arcade_mix(forward, turn);

        self.set_left_power(left, self.config.max_drive_speed, 0.0);
        self.set_right_power(right, self.config.max_drive_speed);
    }

    // Both left channels always get the identical command; the optional
    // correction term is added after the cap so straight drives can steer.
    fn set_left_power(&mut self, power: f64, max_power: f64, correction: f64) {
        let power = bound_value(power) * max_power + correction;
        self.left_front.set_power(power);
        self.left_back.set_power(power);
    }

    fn set_right_power(&mut self, power: f64, max_power: f64) {
        let power = bound_value(power) * max_power;
        self.right_front.set_power(power);
        self.right_back.set_power(power);
    }

    fn set_mode_all(&mut self, mode: RunMode) {
        self.left_front.set_mode(mode);
        self.left_back.set_mode(mode);
        self.right_front.set_mode(mode);
        self.right_back.set_mode(mode);
    }

    fn all_busy(&self) -> bool {
        self.left_front.is_busy()
            && self.left_back.is_busy()
            && self.right_front.is_busy()
            && self.right_back.is_busy()
    }

    fn stop(&mut self) {
        self.set_left_power(0.0, 0.0, 0.0);
        self.set_right_power(0.0, 0.0);
    }

    // Straight-drive correction: accumulated drift times the heading gain.
    fn heading_correction(&mut self) -> f64 {
        self.heading.sample(self.gyro.heading()) * self.config.heading_gain
    }
}
