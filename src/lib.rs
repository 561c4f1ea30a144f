//! Hoverkit - fixed-step locomotion controllers
//!
//! Core modules:
//! - `sim`: Force/velocity shaping for drones, guided projectiles and hover bodies
//! - `audio`: Feedback hook driven by body speed
//! - `settings`: Validated configuration aggregate, persisted as JSON

pub mod audio;
pub mod settings;
pub mod sim;

pub use audio::{FeedbackSink, rotor_pitch};
pub use settings::Settings;

use glam::{EulerRot, Mat3, Quat, Vec3};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, the usual engine fixed step)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity magnitude (m/s²)
    pub const GRAVITY: f32 = 9.81;

    /// Elevation input scale when rising
    pub const RISE_MULTIPLIER: f32 = 2.0;
    /// Elevation input divisor when descending
    pub const FALL_DIVISOR: f32 = 4.0;

    /// Speed that raises the rotor pitch by one octave-ish step
    pub const PITCH_SPEED_DIVISOR: f32 = 100.0;

    /// Upper bound for any smoothing derivative
    pub const MAX_SMOOTHING_SPEED: f32 = 1.0e6;
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Orientation from Euler angles in degrees.
///
/// Applied as roll (z), then pitch (x), then yaw (y), so yaw is always about
/// world up regardless of tilt.
#[inline]
pub fn euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Orientation whose +Z axis points along `direction` with +Y as close to
/// `up` as possible. `None` for a zero direction.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    match up.cross(forward).try_normalize() {
        Some(right) => {
            let up = forward.cross(right);
            Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)))
        }
        // Looking straight along `up`
        None => Some(Quat::from_rotation_arc(Vec3::Z, forward)),
    }
}

/// Rotate `from` toward `to` by at most `max_degrees`.
pub fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= f32::EPSILON {
        return to;
    }
    let t = (max_degrees.max(0.0).to_radians() / angle).min(1.0);
    from.slerp(to, t).normalize()
}
