//! Speed ceiling policy
//!
//! Picks a ceiling from the active movement axes, then eases the allowed
//! magnitude toward it. Approach is exponential: each tick covers
//! `dt * rate` of the remaining gap.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::lerp;

/// Which horizontal inputs are non-zero this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveAxes {
    pub forward: bool,
    pub strafe: bool,
}

impl ActiveAxes {
    pub fn from_inputs(forward: f32, strafe: f32) -> Self {
        Self {
            forward: forward != 0.0,
            strafe: strafe != 0.0,
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.forward || self.strafe
    }
}

/// Speed ceilings for each movement mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedCeilings {
    /// Forward and strafe share `uniform`
    pub uniform_movement: bool,
    pub uniform: f32,
    pub forward: f32,
    pub strafe: f32,
    /// Ceiling when both axes are active in split mode; see [`SpeedCeilings::refresh_combined`]
    pub combined: f32,
}

impl SpeedCeilings {
    /// Recompute the combined ceiling after forward/strafe change
    pub fn refresh_combined(&mut self) {
        self.combined = self.forward.hypot(self.strafe);
    }

    /// Ceiling for the given axes, `None` when nothing is active
    pub fn select(&self, axes: ActiveAxes) -> Option<f32> {
        if !axes.any() {
            return None;
        }
        if self.uniform_movement {
            return Some(self.uniform);
        }
        Some(match (axes.forward, axes.strafe) {
            (true, true) => self.combined,
            (true, false) => self.forward,
            _ => self.strafe,
        })
    }
}

/// `velocity` with magnitude at most `max`
#[inline]
pub fn clamp_magnitude(velocity: Vec3, max: f32) -> Vec3 {
    velocity.clamp_length_max(max.max(0.0))
}

/// Bound the velocity magnitude for this tick.
///
/// With an active axis the bound approaches the ceiling at `accel` and never
/// exceeds it. With none the bound decays toward zero at `decel`.
pub fn clamp_velocity(
    velocity: Vec3,
    axes: ActiveAxes,
    ceilings: &SpeedCeilings,
    accel: f32,
    decel: f32,
    dt: f32,
) -> Vec3 {
    let speed = velocity.length();
    let bound = match ceilings.select(axes) {
        Some(ceiling) => lerp(speed, ceiling, dt * accel).min(ceiling),
        None => lerp(speed, 0.0, dt * decel),
    };
    clamp_magnitude(velocity, bound)
}
