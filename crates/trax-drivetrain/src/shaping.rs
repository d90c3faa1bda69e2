//! Power shaping for teleop and closed-loop commands.

use libm::fabs;

/// Clamps a power command to `[-1.0, 1.0]`.
///
/// Idempotent: applying it twice gives the same result as once.
pub fn bound_value(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Forces any value with magnitude below `band` to exactly zero.
///
/// Suppresses joystick drift and noise around center.
pub fn deadband(value: f64, band: f64) -> f64 {
    if -band < value && value < band {
        0.0
    } else {
        value
    }
}

/// Mixes forward and turn commands into left/right side powers.
///
/// `left = forward + turn`, `right = forward - turn`. If either mixed value
/// exceeds unit magnitude, both are divided by the common maximum so the
/// turn-to-drive ratio is preserved while staying inside `[-1.0, 1.0]`.
///
/// # Arguments
///
/// * `forward`: Forward/backward command in `[-1.0, 1.0]`.
/// * `turn`: Turn command in `[-1.0, 1.0]`, positive to the left.
///
/// # Returns
///
/// The `(left, right)` side powers.
pub fn arcade_mix(forward: f64, turn: f64) -> (f64, f64) {
    let mut left = forward + turn;
    let mut right = forward - turn;

    let max = fabs(left).max(fabs(right));
    if max > 1.0 {
        left /= max;
        right /= max;
    }

    (left, right)
}
