//! Simulated drivetrain hardware for host runs and tests.
//!
//! A [`SimWorld`] holds the virtual clock, the four wheel channels, and the
//! yaw implied by differential wheel travel. Device handles ([`SimMotor`],
//! [`SimGyro`], [`SimSession`]) share the world through `Rc<RefCell<_>>`;
//! everything is single-threaded, matching the controller's cooperative
//! execution model.
//!
//! Time only moves when the session is polled or slept: `elapsed()` charges
//! one [`SimConfig::poll_tick`] per call so tight busy-poll loops make
//! progress, and `sleep(d)` advances the world by exactly `d`.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use crate::gyro::Gyro;
use crate::motor::{DriveMotor, RunMode};
use crate::session::Session;

/// Wheel index of the left front channel.
pub const LEFT_FRONT: usize = 0;
/// Wheel index of the left back channel.
pub const LEFT_BACK: usize = 1;
/// Wheel index of the right front channel.
pub const RIGHT_FRONT: usize = 2;
/// Wheel index of the right back channel.
pub const RIGHT_BACK: usize = 3;

/// Physical and timing parameters of the simulated robot.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Encoder counts per second of wheel travel at full commanded power.
    pub max_counts_per_sec: f64,
    /// Track width expressed in encoder counts of wheel travel.
    pub track_width_counts: f64,
    /// Position-mode channels report not-busy within this many counts.
    pub position_tolerance: i32,
    /// Gyro warm-up before `is_calibrated` reports true.
    pub calibration_time: Duration,
    /// Virtual time charged to each `Session::elapsed` poll.
    pub poll_tick: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_counts_per_sec: 2000.0,
            track_width_counts: 2000.0,
            position_tolerance: 8,
            calibration_time: Duration::from_millis(100),
            poll_tick: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Channel {
    position: f64,
    target: i32,
    power: f64,
    mode: RunMode,
    busy: bool,
}

impl Channel {
    fn new() -> Self {
        Channel {
            position: 0.0,
            target: 0,
            power: 0.0,
            mode: RunMode::Velocity,
            busy: false,
        }
    }
}

/// The shared simulation state behind every device handle.
#[derive(Debug)]
pub struct SimWorld {
    config: SimConfig,
    clock: Duration,
    channels: [Channel; 4],
}

/// Shared handle to a [`SimWorld`].
pub type SharedWorld = Rc<RefCell<SimWorld>>;

impl SimWorld {
    /// Creates a world wrapped for sharing between device handles.
    pub fn shared(config: SimConfig) -> SharedWorld {
        Rc::new(RefCell::new(SimWorld {
            config,
            clock: Duration::ZERO,
            channels: [Channel::new(); 4],
        }))
    }

    /// Virtual time since the world was created.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Seeds a channel's encoder position, for tests that need unequal starts.
    pub fn seed_position(&mut self, index: usize, counts: i32) {
        self.channels[index].position = f64::from(counts);
    }

    /// Yaw implied by differential wheel travel, wrapped to `(-180, 180]`
    /// degrees, positive counter-clockwise.
    pub fn yaw_degrees(&self) -> f64 {
        let left = (self.channels[LEFT_FRONT].position + self.channels[LEFT_BACK].position) / 2.0;
        let right =
            (self.channels[RIGHT_FRONT].position + self.channels[RIGHT_BACK].position) / 2.0;
        let theta = (right - left) / self.config.track_width_counts;
        wrap_degrees(theta * 180.0 / PI)
    }

    /// Advances the virtual clock and integrates wheel motion over `dt`.
    pub fn step(&mut self, dt: Duration) {
        self.clock += dt;
        let dt = dt.as_secs_f64();
        let max = self.config.max_counts_per_sec;
        let tol = f64::from(self.config.position_tolerance);
        for ch in &mut self.channels {
            match ch.mode {
                RunMode::Velocity => {
                    ch.position += ch.power.clamp(-1.0, 1.0) * max * dt;
                }
                RunMode::Position => {
                    if !ch.busy {
                        continue;
                    }
                    let err = f64::from(ch.target) - ch.position;
                    let step = ch.power.abs().clamp(0.0, 1.0) * max * dt;
                    if err.abs() <= step || err.abs() <= tol {
                        ch.position = f64::from(ch.target);
                        ch.busy = false;
                    } else {
                        ch.position += step * err.signum();
                    }
                }
            }
        }
    }

    fn refresh_busy(&mut self, index: usize) {
        let ch = &mut self.channels[index];
        let err = f64::from(ch.target) - ch.position;
        ch.busy =
            ch.mode == RunMode::Position && err.abs() > f64::from(self.config.position_tolerance);
    }
}

fn wrap_degrees(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// One simulated motor channel.
#[derive(Debug, Clone)]
pub struct SimMotor {
    world: SharedWorld,
    index: usize,
}

impl SimMotor {
    /// Binds a handle to the channel at `index` (see the wheel index
    /// constants).
    pub fn new(world: &SharedWorld, index: usize) -> Self {
        assert!(index < 4, "wheel index out of range");
        SimMotor {
            world: Rc::clone(world),
            index,
        }
    }
}

impl DriveMotor for SimMotor {
    fn position(&self) -> i32 {
        self.world.borrow().channels[self.index].position as i32
    }

    fn target(&self) -> i32 {
        self.world.borrow().channels[self.index].target
    }

    fn set_target(&mut self, counts: i32) {
        let mut world = self.world.borrow_mut();
        world.channels[self.index].target = counts;
        world.refresh_busy(self.index);
    }

    fn power(&self) -> f64 {
        self.world.borrow().channels[self.index].power
    }

    fn set_power(&mut self, power: f64) {
        self.world.borrow_mut().channels[self.index].power = power;
    }

    fn mode(&self) -> RunMode {
        self.world.borrow().channels[self.index].mode
    }

    fn set_mode(&mut self, mode: RunMode) {
        let mut world = self.world.borrow_mut();
        world.channels[self.index].mode = mode;
        world.refresh_busy(self.index);
    }

    fn is_busy(&self) -> bool {
        self.world.borrow().channels[self.index].busy
    }
}

/// Simulated yaw gyro reading the shared world.
#[derive(Debug, Clone)]
pub struct SimGyro {
    world: SharedWorld,
}

impl SimGyro {
    /// Binds a gyro handle to the world.
    pub fn new(world: &SharedWorld) -> Self {
        SimGyro {
            world: Rc::clone(world),
        }
    }
}

impl Gyro for SimGyro {
    fn is_calibrated(&self) -> bool {
        let world = self.world.borrow();
        world.clock >= world.config.calibration_time
    }

    fn heading(&self) -> f64 {
        self.world.borrow().yaw_degrees()
    }
}

/// Session driving the virtual clock.
#[derive(Debug, Clone)]
pub struct SimSession {
    world: SharedWorld,
    active: Rc<Cell<bool>>,
}

impl SimSession {
    /// Creates an active session over the world.
    pub fn new(world: &SharedWorld) -> Self {
        SimSession {
            world: Rc::clone(world),
            active: Rc::new(Cell::new(true)),
        }
    }

    /// Cancellation flag shared with this session; set it to `false` to stop
    /// any control loop at its next poll.
    pub fn active_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.active)
    }
}

impl Session for SimSession {
    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn elapsed(&mut self) -> Duration {
        let mut world = self.world.borrow_mut();
        let tick = world.config.poll_tick;
        world.step(tick);
        world.clock
    }

    fn sleep(&mut self, dur: Duration) {
        self.world.borrow_mut().step(dur);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> (SharedWorld, [SimMotor; 4], SimGyro, SimSession) {
        let world = SimWorld::shared(SimConfig::default());
        let motors = [
            SimMotor::new(&world, LEFT_FRONT),
            SimMotor::new(&world, LEFT_BACK),
            SimMotor::new(&world, RIGHT_FRONT),
            SimMotor::new(&world, RIGHT_BACK),
        ];
        let gyro = SimGyro::new(&world);
        let session = SimSession::new(&world);
        (world, motors, gyro, session)
    }

    #[test]
    fn position_mode_converges_and_clears_busy() {
        let (world, mut motors, _gyro, _session) = rig();
        let m = &mut motors[LEFT_FRONT];
        m.set_mode(RunMode::Position);
        m.set_target(1000);
        m.set_power(1.0);
        assert!(m.is_busy());
        // 2000 counts/s at full power: 1000 counts in 0.5 s
        world.borrow_mut().step(Duration::from_millis(600));
        assert!(!m.is_busy());
        assert_eq!(m.position(), 1000);
    }

    #[test]
    fn position_mode_without_power_stays_busy() {
        let (world, mut motors, _gyro, _session) = rig();
        let m = &mut motors[RIGHT_BACK];
        m.set_mode(RunMode::Position);
        m.set_target(500);
        world.borrow_mut().step(Duration::from_secs(5));
        assert!(m.is_busy());
        assert_eq!(m.position(), 0);
    }

    #[test]
    fn velocity_mode_integrates_power() {
        let (world, mut motors, _gyro, _session) = rig();
        motors[LEFT_BACK].set_mode(RunMode::Velocity);
        motors[LEFT_BACK].set_power(0.5);
        world.borrow_mut().step(Duration::from_secs(1));
        // 0.5 * 2000 counts/s * 1 s = 1000 counts
        assert_eq!(motors[LEFT_BACK].position(), 1000);
    }

    #[test]
    fn differential_travel_yields_ccw_yaw() {
        let (world, mut motors, gyro, _session) = rig();
        for m in &mut motors {
            m.set_mode(RunMode::Velocity);
        }
        // Right side forward, left side back: spin counter-clockwise.
        motors[LEFT_FRONT].set_power(-0.5);
        motors[LEFT_BACK].set_power(-0.5);
        motors[RIGHT_FRONT].set_power(0.5);
        motors[RIGHT_BACK].set_power(0.5);
        world.borrow_mut().step(Duration::from_millis(500));
        // travel per side = 0.5 * 2000 * 0.5 = 500 counts
        // theta = (500 - (-500)) / 2000 = 0.5 rad ~ 28.6 degrees
        let yaw = gyro.heading();
        assert!(yaw > 28.0 && yaw < 29.3, "yaw = {yaw}");
    }

    #[test]
    fn gyro_calibrates_after_warm_up() {
        let (world, _motors, gyro, _session) = rig();
        assert!(!gyro.is_calibrated());
        world.borrow_mut().step(Duration::from_millis(150));
        assert!(gyro.is_calibrated());
    }

    #[test]
    fn session_polls_and_sleeps_advance_the_clock() {
        let (_world, _motors, _gyro, mut session) = rig();
        let t0 = session.elapsed();
        session.sleep(Duration::from_millis(50));
        let t1 = session.elapsed();
        assert!(t1 >= t0 + Duration::from_millis(50));
        assert!(session.is_active());
        session.active_flag().set(false);
        assert!(!session.is_active());
    }
}
