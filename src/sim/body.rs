//! Capabilities the controllers need from the host physics engine
//!
//! Controllers never own a body. They borrow one for the duration of a tick
//! through [`RigidBody`], query the world through [`Raycast`], and resolve
//! tracked targets through [`TargetLookup`].
//!
//! [`SimBody`] and [`FlatGround`] are small reference implementations used by
//! the demo binary and the tests.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Translation + rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }

    /// Compose: `other` expressed in this pose's frame, returned in the parent frame
    pub fn transform(&self, other: &Pose) -> Pose {
        Pose {
            translation: self.translation + self.rotation * other.translation,
            rotation: (self.rotation * other.rotation).normalize(),
        }
    }

    /// Local +Y in the parent frame
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Rigid body owned by the physics engine
pub trait RigidBody {
    fn mass(&self) -> f32;
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    /// Accumulate a world-space force at a world-space point
    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3);
    /// Accumulate a force expressed in the body's local frame
    fn apply_relative_force(&mut self, force: Vec3);
    /// Teleport the orientation immediately
    fn set_rotation(&mut self, rotation: Quat);
    /// Move the orientation during the next solver step
    fn move_rotation(&mut self, rotation: Quat);
    fn set_damping(&mut self, linear: f32, angular: f32);
    fn set_gravity_enabled(&mut self, enabled: bool);

    /// Body pose in world space
    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.rotation())
    }
}

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Distance from ray origin
    pub distance: f32,
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}

/// World geometry the hover field casts against
pub trait Raycast {
    /// Cast from `origin` along `direction` (need not be normalized)
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit>;
}

/// Identifier of a body tracked by homing guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Resolves tracked targets to their current world position
pub trait TargetLookup {
    fn target_position(&self, id: TargetId) -> Option<Vec3>;
}

/// No tracked bodies exist
impl TargetLookup for () {
    fn target_position(&self, _id: TargetId) -> Option<Vec3> {
        None
    }
}

/// Fixed table of target positions
impl TargetLookup for [(TargetId, Vec3)] {
    fn target_position(&self, id: TargetId) -> Option<Vec3> {
        self.iter().find(|(t, _)| *t == id).map(|(_, pos)| *pos)
    }
}

/// Infinite horizontal plane at `height`
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl Raycast for FlatGround {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let dir = direction.try_normalize()?;
        if dir.y >= 0.0 {
            return None;
        }
        let distance = (self.height - origin.y) / dir.y;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }
        Some(RaycastHit {
            distance,
            point: origin + dir * distance,
            normal: Vec3::Y,
        })
    }
}

/// Minimal semi-implicit Euler body.
///
/// Forces accumulate between steps and are consumed by [`SimBody::step`].
/// Angular response treats the body as a unit-radius sphere.
#[derive(Debug, Clone)]
pub struct SimBody {
    pub mass: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub drag: f32,
    pub angular_drag: f32,
    pub use_gravity: bool,
    force: Vec3,
    torque: Vec3,
    pending_rotation: Option<Quat>,
}

impl SimBody {
    pub fn new(mass: f32) -> Self {
        Self {
            mass: mass.max(f32::EPSILON),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            drag: 0.0,
            angular_drag: 0.05,
            use_gravity: true,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            pending_rotation: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Forces accumulated since the last step (world space)
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    /// Integrate one fixed step and clear accumulators
    pub fn step(&mut self, dt: f32) {
        let mut accel = self.force / self.mass;
        if self.use_gravity {
            accel -= Vec3::Y * GRAVITY;
        }
        self.velocity += accel * dt;
        self.velocity *= (1.0 - self.drag * dt).clamp(0.0, 1.0);
        self.position += self.velocity * dt;

        // Solid sphere, unit radius
        let inertia = 0.4 * self.mass;
        self.angular_velocity += self.torque / inertia * dt;
        self.angular_velocity *= (1.0 - self.angular_drag * dt).clamp(0.0, 1.0);

        if let Some(rotation) = self.pending_rotation.take() {
            self.rotation = rotation;
        } else if self.angular_velocity != Vec3::ZERO {
            let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
            self.rotation = (spin * self.rotation).normalize();
        }

        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

impl RigidBody for SimBody {
    fn mass(&self) -> f32 {
        self.mass
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }

    fn apply_relative_force(&mut self, force: Vec3) {
        self.force += self.rotation * force;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.pending_rotation = None;
    }

    fn move_rotation(&mut self, rotation: Quat) {
        self.pending_rotation = Some(rotation.normalize());
    }

    fn set_damping(&mut self, linear: f32, angular: f32) {
        self.drag = linear.max(0.0);
        self.angular_drag = angular.max(0.0);
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.use_gravity = enabled;
    }
}
