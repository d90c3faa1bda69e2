mod config;
mod session;
mod telemetry;

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trax_drivetrain::Drivetrain;
use trax_hal::{DriveMotor, Session};
use trax_hal::sim::{
    LEFT_BACK, LEFT_FRONT, RIGHT_BACK, RIGHT_FRONT, SimConfig, SimGyro, SimMotor, SimWorld,
};

use crate::session::RealtimeSession;
use crate::telemetry::LogTelemetry;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let drive_config = config::load_config().context("loading drive configuration")?;

    let world = SimWorld::shared(SimConfig::default());
    let left_front = SimMotor::new(&world, LEFT_FRONT);
    let right_front = SimMotor::new(&world, RIGHT_FRONT);
    let mut drivetrain = Drivetrain::new(
        drive_config,
        left_front.clone(),
        SimMotor::new(&world, LEFT_BACK),
        right_front.clone(),
        SimMotor::new(&world, RIGHT_BACK),
        SimGyro::new(&world),
    )?;

    let mut session = RealtimeSession::new(&world);
    let mut telemetry = LogTelemetry;

    if !drivetrain.wait_for_calibration(&mut session, &mut telemetry, Duration::from_millis(50)) {
        warn!("gyro calibration interrupted, continuing anyway");
    }

    info!("driving forward 24 inches");
    let ok = drivetrain.drive_to_distance(&mut session, 24.0, Duration::from_secs(5));
    info!(ok, "drive finished");

    info!("turning to +90 degrees");
    let ok = drivetrain.turn_to_degree(&mut session, 90.0, 5.0, Duration::from_secs(5));
    info!(ok, "turn finished");

    info!("turning to -45 degrees");
    let ok = drivetrain.turn_to_degree(&mut session, -45.0, 5.0, Duration::from_secs(5));
    info!(ok, "turn finished");

    info!("arcade teleop demo");
    for (forward, turn) in [(0.5, 0.0), (0.5, 0.3), (0.05, 0.05), (0.0, -0.6)] {
        drivetrain.arcade_drive(forward, turn);
        info!(
            "arcade ({:+.2}, {:+.2}) -> left {:+.2}, right {:+.2}",
            forward,
            turn,
            left_front.power(),
            right_front.power()
        );
        session.sleep(Duration::from_millis(250));
    }
    drivetrain.arcade_drive(0.0, 0.0);

    info!(
        "mission complete, final yaw {:.1} degrees",
        world.borrow().yaw_degrees()
    );
    Ok(())
}
