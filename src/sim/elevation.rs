//! Vertical thrust
//!
//! Rising is twice as strong as the configured rate, falling a quarter of it.
//! With no input the model holds altitude by cancelling gravity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use crate::consts::{FALL_DIVISOR, GRAVITY, RISE_MULTIPLIER};

/// Elevation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Allow input to change altitude (otherwise no vertical thrust at all)
    pub enabled: bool,
    /// Cancel vertical drift while moving horizontally with no elevation input
    pub correct_drift: bool,
    /// Upward rate, scaled by mass
    pub rise_rate: f32,
    /// Downward rate, scaled by mass
    pub fall_rate: f32,
    /// Gravity magnitude cancelled while holding altitude
    pub gravity: f32,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            correct_drift: true,
            rise_rate: 10.0,
            fall_rate: 10.0,
            gravity: GRAVITY,
        }
    }
}

impl ElevationConfig {
    /// Clamp out-of-range values in place
    pub fn validate(&mut self) {
        if self.rise_rate < 0.0 || self.fall_rate < 0.0 || self.gravity < 0.0 {
            log::debug!(
                "Clamping elevation config (rise {}, fall {}, gravity {})",
                self.rise_rate,
                self.fall_rate,
                self.gravity
            );
        }
        self.rise_rate = self.rise_rate.max(0.0);
        self.fall_rate = self.fall_rate.max(0.0);
        self.gravity = self.gravity.max(0.0);
    }
}

/// Asymmetric up/down force with hover-in-place fallback
#[derive(Debug, Clone, Default)]
pub struct ElevationForceModel {
    config: ElevationConfig,
    /// Last clamped input
    input: f32,
}

impl ElevationForceModel {
    pub fn new(mut config: ElevationConfig) -> Self {
        config.validate();
        Self { config, input: 0.0 }
    }

    pub fn config(&self) -> &ElevationConfig {
        &self.config
    }

    pub fn set_config(&mut self, mut config: ElevationConfig) {
        config.validate();
        self.config = config;
    }

    /// Last clamped elevation input
    pub fn input(&self) -> f32 {
        self.input
    }

    /// Body-local force for a clamped input
    pub fn force_for(&self, input: f32, mass: f32) -> Vec3 {
        let magnitude = if input > 0.0 {
            self.config.rise_rate * mass * (input * RISE_MULTIPLIER)
        } else if input < 0.0 {
            self.config.fall_rate * mass * (input / FALL_DIVISOR)
        } else {
            self.config.gravity * mass
        };
        Vec3::Y * magnitude
    }

    /// Apply this tick's vertical thrust, returning the body-local force.
    ///
    /// `moving` is whether forward or strafe input is active this tick.
    pub fn apply<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: f32, moving: bool) -> Vec3 {
        self.input = input.clamp(-1.0, 1.0);

        if self.config.correct_drift && moving && self.input == 0.0 {
            let v = body.linear_velocity();
            if v.y != 0.0 {
                body.set_linear_velocity(Vec3::new(v.x, 0.0, v.z));
            }
        }

        if !self.config.enabled {
            return Vec3::ZERO;
        }

        let force = self.force_for(self.input, body.mass());
        body.apply_relative_force(force);
        force
    }
}
