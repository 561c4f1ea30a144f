//! Drone flight controller
//!
//! Forward/strafe input pushes the body along its local Z/X axes and tilts
//! it, elevation input drives [`ElevationForceModel`], rotation input turns
//! the drone about world up. After forces are applied the speed is bounded by
//! the clamp policy, then tilt and yaw are written back to the body.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::clamp::{ActiveAxes, SpeedCeilings, clamp_velocity};
use super::elevation::{ElevationConfig, ElevationForceModel};
use super::smoothing::AxisState;
use crate::audio::{FeedbackSink, rotor_pitch};
use crate::euler_degrees;

/// Drone tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    /// Tilt the whole body; otherwise only tilt parts lean
    pub uniform_tilt: bool,
    /// Forward and strafe share `movement_speed`, `tilt_amount` and `tilt_speed`
    pub uniform_movement: bool,
    pub movement_speed: f32,
    pub forward_speed: f32,
    pub strafe_speed: f32,
    /// Rate the speed bound approaches the ceiling while moving
    pub acceleration: f32,
    /// Rate the speed bound decays to zero while idle
    pub deceleration: f32,
    pub elevation: ElevationConfig,
    /// Yaw degrees added per tick at full rotation input
    pub rotation_amount: f32,
    /// Yaw smoothing time, [0, 1]
    pub rotation_speed: f32,
    /// Tilt degrees at full input (uniform movement)
    pub tilt_amount: f32,
    /// Tilt smoothing time, [0, 1] (uniform movement)
    pub tilt_speed: f32,
    pub forward_tilt: f32,
    pub strafe_tilt: f32,
    pub forward_tilt_speed: f32,
    pub strafe_tilt_speed: f32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            uniform_tilt: true,
            uniform_movement: true,
            movement_speed: 0.0,
            forward_speed: 0.0,
            strafe_speed: 0.0,
            acceleration: 0.0,
            deceleration: 0.0,
            elevation: ElevationConfig::default(),
            rotation_amount: 0.0,
            rotation_speed: 0.0,
            tilt_amount: 0.0,
            tilt_speed: 0.0,
            forward_tilt: 0.0,
            strafe_tilt: 0.0,
            forward_tilt_speed: 0.0,
            strafe_tilt_speed: 0.0,
        }
    }
}

impl DroneConfig {
    pub fn validate(&mut self) {
        self.movement_speed = self.movement_speed.max(0.0);
        self.forward_speed = self.forward_speed.max(0.0);
        self.strafe_speed = self.strafe_speed.max(0.0);
        self.acceleration = self.acceleration.abs();
        self.deceleration = self.deceleration.abs();
        self.elevation.validate();

        self.rotation_amount = self.rotation_amount.max(0.0);
        self.rotation_speed = self.rotation_speed.abs().min(1.0);

        self.tilt_amount = self.tilt_amount.max(0.0);
        self.forward_tilt = self.forward_tilt.max(0.0);
        self.strafe_tilt = self.strafe_tilt.max(0.0);
        self.tilt_speed = self.tilt_speed.clamp(0.0, 1.0);
        self.forward_tilt_speed = self.forward_tilt_speed.clamp(0.0, 1.0);
        self.strafe_tilt_speed = self.strafe_tilt_speed.clamp(0.0, 1.0);
    }

    /// Speed ceilings derived from this config
    pub fn ceilings(&self) -> SpeedCeilings {
        let mut ceilings = SpeedCeilings {
            uniform_movement: self.uniform_movement,
            uniform: self.movement_speed,
            forward: self.forward_speed,
            strafe: self.strafe_speed,
            combined: 0.0,
        };
        ceilings.refresh_combined();
        ceilings
    }

    fn forward_push(&self) -> f32 {
        if self.uniform_movement { self.movement_speed } else { self.forward_speed }
    }

    fn strafe_push(&self) -> f32 {
        if self.uniform_movement { self.movement_speed } else { self.strafe_speed }
    }

    /// (degrees at full input, smoothing time)
    fn forward_tilt_params(&self) -> (f32, f32) {
        if self.uniform_movement {
            (self.tilt_amount, self.tilt_speed)
        } else {
            (self.forward_tilt, self.forward_tilt_speed)
        }
    }

    fn strafe_tilt_params(&self) -> (f32, f32) {
        if self.uniform_movement {
            (self.tilt_amount, self.tilt_speed)
        } else {
            (self.strafe_tilt, self.strafe_tilt_speed)
        }
    }
}

/// Per-tick drone input, each axis in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DroneInput {
    pub forward: f32,
    pub strafe: f32,
    pub elevation: f32,
    pub rotation: f32,
}

/// Orientations produced by the tilt step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltPose {
    /// Written to the body
    pub body: Quat,
    /// Local rotation for parts that lean with forward movement
    pub forward_parts: Quat,
    /// Local rotation for parts that lean with strafe movement
    pub strafe_parts: Quat,
}

/// Flight state for one drone
#[derive(Debug, Clone)]
pub struct DroneController {
    config: DroneConfig,
    ceilings: SpeedCeilings,
    elevation: ElevationForceModel,
    forward_input: f32,
    strafe_input: f32,
    forward_tilt: AxisState,
    strafe_tilt: AxisState,
    yaw: AxisState,
    desired_yaw: f32,
    pitch: f32,
}

impl DroneController {
    pub fn new(mut config: DroneConfig) -> Self {
        config.validate();
        Self {
            ceilings: config.ceilings(),
            elevation: ElevationForceModel::new(config.elevation),
            config,
            forward_input: 0.0,
            strafe_input: 0.0,
            forward_tilt: AxisState::default(),
            strafe_tilt: AxisState::default(),
            yaw: AxisState::default(),
            desired_yaw: 0.0,
            pitch: 1.0,
        }
    }

    pub fn config(&self) -> &DroneConfig {
        &self.config
    }

    /// Replace tuning. Validation and derived ceilings run once here;
    /// smoothing state is left untouched.
    pub fn set_config(&mut self, mut config: DroneConfig) {
        config.validate();
        self.ceilings = config.ceilings();
        self.elevation.set_config(config.elevation);
        self.config = config;
        log::debug!("Drone config updated, ceilings {:?}", self.ceilings);
    }

    /// Edit the config in place and revalidate
    pub fn update_config(&mut self, edit: impl FnOnce(&mut DroneConfig)) {
        let mut config = self.config;
        edit(&mut config);
        self.set_config(config);
    }

    pub fn ceilings(&self) -> &SpeedCeilings {
        &self.ceilings
    }

    pub fn movement_speed(&self) -> f32 {
        self.config.movement_speed
    }

    pub fn set_movement_speed(&mut self, speed: f32) {
        self.update_config(|c| c.movement_speed = speed);
    }

    pub fn forward_speed(&self) -> f32 {
        self.config.forward_speed
    }

    pub fn set_forward_speed(&mut self, speed: f32) {
        self.update_config(|c| c.forward_speed = speed);
    }

    pub fn strafe_speed(&self) -> f32 {
        self.config.strafe_speed
    }

    pub fn set_strafe_speed(&mut self, speed: f32) {
        self.update_config(|c| c.strafe_speed = speed);
    }

    pub fn set_acceleration(&mut self, accel: f32, decel: f32) {
        self.update_config(|c| {
            c.acceleration = accel;
            c.deceleration = decel;
        });
    }

    pub fn set_elevation_rates(&mut self, rise: f32, fall: f32) {
        self.update_config(|c| {
            c.elevation.rise_rate = rise;
            c.elevation.fall_rate = fall;
        });
    }

    pub fn set_rotation(&mut self, amount: f32, speed: f32) {
        self.update_config(|c| {
            c.rotation_amount = amount;
            c.rotation_speed = speed;
        });
    }

    pub fn set_tilt(&mut self, amount: f32, speed: f32) {
        self.update_config(|c| {
            c.tilt_amount = amount;
            c.tilt_speed = speed;
        });
    }

    /// Current forward tilt in degrees
    pub fn forward_tilt(&self) -> f32 {
        self.forward_tilt.current
    }

    /// Current strafe tilt in degrees
    pub fn strafe_tilt(&self) -> f32 {
        self.strafe_tilt.current
    }

    /// Current smoothed yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw.current
    }

    pub fn desired_yaw(&self) -> f32 {
        self.desired_yaw
    }

    /// Rotor pitch computed by the last feedback step
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn elevation(&self) -> &ElevationForceModel {
        &self.elevation
    }

    /// Drop all smoothing state and inputs
    pub fn reset(&mut self) {
        self.forward_input = 0.0;
        self.strafe_input = 0.0;
        self.forward_tilt.reset(0.0);
        self.strafe_tilt.reset(0.0);
        self.yaw.reset(0.0);
        self.desired_yaw = 0.0;
        self.pitch = 1.0;
    }

    fn moving(&self) -> bool {
        ActiveAxes::from_inputs(self.forward_input, self.strafe_input).any()
    }

    /// Vertical thrust for this tick, returns the body-local force.
    ///
    /// The horizontal axes of `input` are recorded first so drift correction
    /// sees this tick's movement.
    pub fn advance_elevation<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: &DroneInput) -> Vec3 {
        self.forward_input = input.forward.clamp(-1.0, 1.0);
        self.strafe_input = input.strafe.clamp(-1.0, 1.0);
        let moving = self.moving();
        self.elevation.apply(body, input.elevation, moving)
    }

    fn push_forward<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: f32, dt: f32) {
        self.forward_input = input.clamp(-1.0, 1.0);
        body.apply_relative_force(Vec3::Z * (self.forward_input * self.config.forward_push()));

        let (amount, time) = self.config.forward_tilt_params();
        self.forward_tilt.advance(amount * self.forward_input, time, dt);
    }

    fn push_strafe<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: f32, dt: f32) {
        self.strafe_input = input.clamp(-1.0, 1.0);
        body.apply_relative_force(Vec3::X * (self.strafe_input * self.config.strafe_push()));

        // Lean away from the strafe direction
        let (amount, time) = self.config.strafe_tilt_params();
        self.strafe_tilt.advance(amount * -self.strafe_input, time, dt);
    }

    /// Forward thrust, then clamp and tilt
    pub fn advance_forward<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: f32, dt: f32) -> TiltPose {
        self.push_forward(body, input, dt);
        self.clamp_speed(body, dt);
        let pose = self.apply_tilt(body);
        self.update_pitch(body);
        pose
    }

    /// Strafe thrust, then clamp and tilt
    pub fn advance_strafe<B: RigidBody + ?Sized>(&mut self, body: &mut B, input: f32, dt: f32) -> TiltPose {
        self.push_strafe(body, input, dt);
        self.clamp_speed(body, dt);
        let pose = self.apply_tilt(body);
        self.update_pitch(body);
        pose
    }

    /// Integrate rotation input into the desired yaw and smooth toward it.
    /// Takes effect on the next tilt step.
    pub fn advance_rotation(&mut self, input: f32, dt: f32) -> f32 {
        let input = input.clamp(-1.0, 1.0);
        if input != 0.0 {
            self.desired_yaw += self.config.rotation_amount * input;
        }
        self.yaw
            .advance(self.desired_yaw, self.config.rotation_speed, dt)
    }

    /// Bound the body speed for the current inputs
    pub fn clamp_speed<B: RigidBody + ?Sized>(&self, body: &mut B, dt: f32) {
        let axes = ActiveAxes::from_inputs(self.forward_input, self.strafe_input);
        let clamped = clamp_velocity(
            body.linear_velocity(),
            axes,
            &self.ceilings,
            self.config.acceleration,
            self.config.deceleration,
            dt,
        );
        body.set_linear_velocity(clamped);
    }

    /// Current tilt and yaw as orientations
    pub fn tilt_pose(&self) -> TiltPose {
        let pitch = self.forward_tilt.current;
        let roll = self.strafe_tilt.current;
        let yaw = self.yaw.current;

        if self.config.uniform_tilt {
            TiltPose {
                body: euler_degrees(pitch, yaw, roll),
                forward_parts: Quat::IDENTITY,
                strafe_parts: Quat::IDENTITY,
            }
        } else {
            TiltPose {
                body: euler_degrees(0.0, yaw, 0.0),
                forward_parts: euler_degrees(pitch, 0.0, 0.0),
                strafe_parts: euler_degrees(0.0, 0.0, roll),
            }
        }
    }

    fn apply_tilt<B: RigidBody + ?Sized>(&self, body: &mut B) -> TiltPose {
        let pose = self.tilt_pose();
        body.set_rotation(pose.body);
        pose
    }

    fn update_pitch<B: RigidBody + ?Sized>(&mut self, body: &B) -> f32 {
        self.pitch = rotor_pitch(body.linear_velocity().length());
        self.pitch
    }

    /// Full drone tick in the required order: elevation, horizontal thrust,
    /// a single clamp, rotation, tilt, then feedback.
    pub fn tick<B, F>(&mut self, body: &mut B, input: &DroneInput, dt: f32, feedback: &mut F) -> TiltPose
    where
        B: RigidBody + ?Sized,
        F: FeedbackSink + ?Sized,
    {
        self.advance_elevation(body, input);
        self.push_forward(body, input.forward, dt);
        self.push_strafe(body, input.strafe, dt);
        self.clamp_speed(body, dt);
        self.advance_rotation(input.rotation, dt);
        let pose = self.apply_tilt(body);

        let pitch = self.update_pitch(body);
        feedback.rotor_pitch(pitch);
        pose
    }
}
