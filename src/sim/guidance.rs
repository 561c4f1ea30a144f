//! Guided projectile steering
//!
//! Three strategies produce a target orientation:
//! - `Controlled`: 2D input is a rotation rate, smoothed and integrated
//! - `Homing`: look at a tracked body, recomputed every tick
//! - `Laser`: look at a designated point, recomputed every tick
//!
//! The projectile then turns toward it at a bounded rate and flies along one
//! of its basis axes at the current speed.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::body::{RigidBody, TargetId, TargetLookup};
use super::smoothing::AxisState;
use crate::{euler_degrees, lerp, look_rotation, rotate_towards};

/// Steering strategy, fixed per projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuidanceMode {
    #[default]
    Controlled,
    Homing,
    Laser,
}

/// Which body axis the projectile flies along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForwardAxis {
    #[default]
    X,
    Y,
    Z,
}

impl ForwardAxis {
    pub fn unit(self) -> Vec3 {
        match self {
            ForwardAxis::X => Vec3::X,
            ForwardAxis::Y => Vec3::Y,
            ForwardAxis::Z => Vec3::Z,
        }
    }
}

/// What the projectile is steering toward
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GuidanceTarget {
    #[default]
    None,
    /// Laser designation
    Point(Vec3),
    /// Homing lock
    Tracked(TargetId),
}

/// Projectile tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub mode: GuidanceMode,
    pub forward_axis: ForwardAxis,
    /// Max turn per tick in degrees, [0, 1]
    pub turn_rate: f32,
    /// Fly at `projectile_velocity` instead of accelerating
    pub uniform_velocity: bool,
    pub projectile_velocity: f32,
    /// Starting speed when accelerating; at least 1
    pub initial_velocity: f32,
    pub max_velocity: f32,
    /// Per-tick fraction of the gap to `max_velocity`, [0, 1]
    pub acceleration_time: f32,
    /// Tracking state at spawn
    pub tracking: bool,
    /// Controlled mode: must be > 0 for steering to respond
    pub input_smoothing: f32,
    pub input_sensitivity: f32,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            mode: GuidanceMode::Controlled,
            forward_axis: ForwardAxis::X,
            turn_rate: 0.5,
            uniform_velocity: false,
            projectile_velocity: 0.0,
            initial_velocity: 1.0,
            max_velocity: 0.0,
            acceleration_time: 0.0,
            tracking: false,
            input_smoothing: 0.0,
            input_sensitivity: 0.0,
        }
    }
}

impl GuidanceConfig {
    pub fn validate(&mut self) {
        self.turn_rate = self.turn_rate.clamp(0.0, 1.0);
        self.projectile_velocity = self.projectile_velocity.max(0.0);
        self.initial_velocity = self.initial_velocity.max(1.0);
        self.max_velocity = self.max_velocity.max(0.0);
        self.acceleration_time = self.acceleration_time.clamp(0.0, 1.0);
        self.input_smoothing = self.input_smoothing.max(0.0);
        self.input_sensitivity = self.input_sensitivity.max(0.0);
    }
}

/// Result of one guidance tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidanceStep {
    /// Tracking disabled; nothing applied
    Inert,
    /// Mode needs a target that is not set or cannot be resolved
    MissingTarget,
    /// Rotation and velocity written to the body
    Steered { rotation: Quat, velocity: Vec3 },
}

/// Steering state for one projectile
#[derive(Debug, Clone)]
pub struct GuidanceModel {
    config: GuidanceConfig,
    target: GuidanceTarget,
    tracking: bool,
    speed: f32,
    /// Smoothed controlled input (pitch, yaw rate)
    smoothed: [AxisState; 2],
    /// Integrated controlled orientation, Euler degrees
    offset: Vec3,
}

impl GuidanceModel {
    pub fn new(mut config: GuidanceConfig) -> Self {
        config.validate();
        Self {
            tracking: config.tracking,
            speed: config.initial_velocity,
            config,
            target: GuidanceTarget::None,
            smoothed: [AxisState::default(); 2],
            offset: Vec3::ZERO,
        }
    }

    /// Prepare the projectile body; projectiles ignore gravity
    pub fn attach<B: RigidBody + ?Sized>(&mut self, body: &mut B) {
        body.set_gravity_enabled(false);
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Replace tuning. Mode and tracking state are kept: both belong to the
    /// live projectile, not to its tuning.
    pub fn set_config(&mut self, mut config: GuidanceConfig) {
        config.validate();
        config.mode = self.config.mode;
        self.config = config;
        if !self.config.uniform_velocity {
            self.speed = self.config.initial_velocity;
        }
    }

    pub fn mode(&self) -> GuidanceMode {
        self.config.mode
    }

    pub fn target(&self) -> GuidanceTarget {
        self.target
    }

    pub fn set_target(&mut self, target: GuidanceTarget) {
        self.target = target;
    }

    /// Homing lock on a tracked body (or clear it)
    pub fn set_tracked(&mut self, id: Option<TargetId>) {
        self.target = id.map_or(GuidanceTarget::None, GuidanceTarget::Tracked);
    }

    /// Laser designation point
    pub fn set_target_position(&mut self, point: Vec3) {
        self.target = GuidanceTarget::Point(point);
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Flip tracking on/off
    pub fn toggle_tracking(&mut self) {
        self.tracking = !self.tracking;
    }

    /// Speed the projectile will fly at this tick
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Actual body speed
    pub fn current_speed<B: RigidBody + ?Sized>(&self, body: &B) -> f32 {
        body.linear_velocity().length()
    }

    pub fn turn_rate(&self) -> f32 {
        self.config.turn_rate
    }

    pub fn set_turn_rate(&mut self, degrees: f32) {
        self.config.turn_rate = degrees;
        self.config.validate();
    }

    pub fn input_smoothing(&self) -> f32 {
        self.config.input_smoothing
    }

    pub fn set_input_smoothing(&mut self, smoothing: f32) {
        self.config.input_smoothing = smoothing;
        self.config.validate();
    }

    pub fn input_sensitivity(&self) -> f32 {
        self.config.input_sensitivity
    }

    pub fn set_input_sensitivity(&mut self, sensitivity: f32) {
        self.config.input_sensitivity = sensitivity;
        self.config.validate();
    }

    pub fn projectile_velocity(&self) -> f32 {
        self.config.projectile_velocity
    }

    pub fn set_projectile_velocity(&mut self, velocity: f32) {
        self.config.projectile_velocity = velocity;
        self.config.validate();
    }

    pub fn initial_velocity(&self) -> f32 {
        self.config.initial_velocity
    }

    pub fn set_initial_velocity(&mut self, velocity: f32) {
        self.config.initial_velocity = velocity;
        self.config.validate();
    }

    pub fn max_velocity(&self) -> f32 {
        self.config.max_velocity
    }

    pub fn set_max_velocity(&mut self, velocity: f32) {
        self.config.max_velocity = velocity;
        self.config.validate();
    }

    pub fn acceleration_time(&self) -> f32 {
        self.config.acceleration_time
    }

    pub fn set_acceleration_time(&mut self, t: f32) {
        self.config.acceleration_time = t;
        self.config.validate();
    }

    /// Drop integrated steering and return to the spawn speed
    pub fn reset(&mut self) {
        self.smoothed = [AxisState::default(); 2];
        self.offset = Vec3::ZERO;
        self.speed = self.config.initial_velocity;
    }

    fn update_speed(&mut self) {
        self.speed = if self.config.uniform_velocity {
            self.config.projectile_velocity
        } else {
            lerp(self.speed, self.config.max_velocity, self.config.acceleration_time)
        };
    }

    /// Integrate controlled input into the running orientation
    fn controlled_rotation(&mut self, input: Vec2, dt: f32) -> Quat {
        let smoothing = self.config.input_smoothing;
        let scale = self.config.input_sensitivity * smoothing;
        // Stick x turns about yaw, stick y about pitch (inverted)
        let rate = Vec2::new(-input.y, input.x) * scale;
        let window = 1.0 / smoothing;

        let pitch = self.smoothed[0].advance(rate.x, window, dt);
        let yaw = self.smoothed[1].advance(rate.y, window, dt);
        self.offset += Vec3::new(pitch, yaw, 0.0);

        euler_degrees(self.offset.x, self.offset.y, self.offset.z)
    }

    fn look_at<B: RigidBody + ?Sized>(body: &B, point: Vec3) -> Option<Quat> {
        look_rotation(point - body.position(), Vec3::Y)
    }

    /// Resolve this tick's target orientation
    fn target_rotation<B, L>(&mut self, body: &B, lookup: &L, input: Vec2, dt: f32) -> Option<Quat>
    where
        B: RigidBody + ?Sized,
        L: TargetLookup + ?Sized,
    {
        match (self.config.mode, self.target) {
            (GuidanceMode::Controlled, _) => Some(self.controlled_rotation(input, dt)),
            (GuidanceMode::Homing, GuidanceTarget::Tracked(id)) => {
                let point = lookup.target_position(id)?;
                Self::look_at(body, point)
            }
            (GuidanceMode::Laser, GuidanceTarget::Point(point)) => Self::look_at(body, point),
            _ => None,
        }
    }

    /// Run one guidance tick.
    ///
    /// `input` is only read in controlled mode; `lookup` only in homing mode.
    pub fn advance_guidance<B, L>(
        &mut self,
        body: &mut B,
        lookup: &L,
        input: Vec2,
        dt: f32,
    ) -> GuidanceStep
    where
        B: RigidBody + ?Sized,
        L: TargetLookup + ?Sized,
    {
        self.update_speed();

        if !self.tracking {
            return GuidanceStep::Inert;
        }

        let Some(target) = self.target_rotation(body, lookup, input, dt) else {
            log::trace!("{:?} guidance has no usable target", self.config.mode);
            return GuidanceStep::MissingTarget;
        };

        let rotation = rotate_towards(body.rotation(), target, self.config.turn_rate);
        body.move_rotation(rotation);

        let velocity = rotation * self.config.forward_axis.unit() * self.speed;
        body.set_linear_velocity(velocity);

        GuidanceStep::Steered { rotation, velocity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::SimBody;

    const DT: f32 = 0.02;

    fn projectile(mode: GuidanceMode) -> GuidanceModel {
        GuidanceModel::new(GuidanceConfig {
            mode,
            forward_axis: ForwardAxis::Z,
            turn_rate: 1.0,
            uniform_velocity: true,
            projectile_velocity: 20.0,
            input_smoothing: 2.0,
            input_sensitivity: 1.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_laser_without_tracking_is_inert() {
        let mut body = SimBody::new(1.0);
        body.velocity = Vec3::new(0.0, 0.0, 3.0);
        let mut g = projectile(GuidanceMode::Laser);
        g.set_target_position(Vec3::new(10.0, 0.0, 0.0));

        for _ in 0..5 {
            assert_eq!(g.advance_guidance(&mut body, &(), Vec2::ZERO, DT), GuidanceStep::Inert);
            body.step(DT);
        }
        assert_eq!(body.rotation, Quat::IDENTITY);
        assert_eq!(body.velocity, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_double_toggle_restores_tracking() {
        let mut g = projectile(GuidanceMode::Laser);
        let start = g.is_tracking();
        g.toggle_tracking();
        assert_ne!(g.is_tracking(), start);
        g.toggle_tracking();
        assert_eq!(g.is_tracking(), start);
    }

    #[test]
    fn test_laser_turns_toward_point() {
        let mut body = SimBody::new(1.0);
        body.use_gravity = false;
        let mut g = projectile(GuidanceMode::Laser);
        g.set_target_position(Vec3::new(10.0, 0.0, 0.0));
        g.toggle_tracking();

        let step = g.advance_guidance(&mut body, &(), Vec2::ZERO, DT);
        let GuidanceStep::Steered { rotation, velocity } = step else {
            panic!("expected steering, got {step:?}");
        };
        // Turn limited to one degree
        assert!((rotation.angle_between(Quat::IDENTITY).to_degrees() - 1.0).abs() < 1e-2);
        assert!((velocity.length() - 20.0).abs() < 1e-4);
        assert!(velocity.x > 0.0);
        assert_eq!(body.velocity, velocity);
    }

    #[test]
    fn test_laser_converges_on_point() {
        let mut body = SimBody::new(1.0);
        body.use_gravity = false;
        let mut g = projectile(GuidanceMode::Laser);
        g.set_target_position(Vec3::new(300.0, 0.0, 0.0));
        g.toggle_tracking();

        for _ in 0..150 {
            g.advance_guidance(&mut body, &(), Vec2::ZERO, DT);
            body.step(DT);
        }
        let heading = body.rotation * Vec3::Z;
        let wanted = (Vec3::new(300.0, 0.0, 0.0) - body.position).normalize();
        assert!(heading.dot(wanted) > 0.99);
    }

    #[test]
    fn test_homing_follows_lookup() {
        let mut body = SimBody::new(1.0);
        let mut g = projectile(GuidanceMode::Homing);
        g.toggle_tracking();

        // No lock
        assert_eq!(
            g.advance_guidance(&mut body, &(), Vec2::ZERO, DT),
            GuidanceStep::MissingTarget
        );

        // Lock on an id the world cannot resolve
        g.set_tracked(Some(TargetId(4)));
        assert_eq!(
            g.advance_guidance(&mut body, &(), Vec2::ZERO, DT),
            GuidanceStep::MissingTarget
        );

        let table = [(TargetId(4), Vec3::new(0.0, 0.0, -50.0))];
        let step = g.advance_guidance(&mut body, &table[..], Vec2::ZERO, DT);
        assert!(matches!(step, GuidanceStep::Steered { .. }));
    }

    #[test]
    fn test_homing_recomputes_heading_each_tick() {
        let mut body = SimBody::new(1.0);
        body.use_gravity = false;
        let mut g = projectile(GuidanceMode::Homing);
        g.set_tracked(Some(TargetId(2)));
        g.toggle_tracking();

        // Target off to the right: turn right
        let right = [(TargetId(2), Vec3::new(50.0, 0.0, 0.0))];
        g.advance_guidance(&mut body, &right[..], Vec2::ZERO, DT);
        body.step(DT);
        let (first_yaw, _, _) = body.rotation.to_euler(glam::EulerRot::YXZ);
        assert!(first_yaw > 0.0);

        // Target jumps to the left: the next tick turns back
        let left = [(TargetId(2), Vec3::new(-50.0, 0.0, 0.0))];
        let step = g.advance_guidance(&mut body, &left[..], Vec2::ZERO, DT);
        body.step(DT);
        let (second_yaw, _, _) = body.rotation.to_euler(glam::EulerRot::YXZ);
        assert!(second_yaw < first_yaw - 0.5f32.to_radians());

        let GuidanceStep::Steered { velocity, .. } = step else {
            panic!("expected steering, got {step:?}");
        };
        assert!((velocity - body.rotation * Vec3::Z * 20.0).length() < 1e-3);
    }

    #[test]
    fn test_velocity_follows_forward_axis() {
        for (axis, unit) in [
            (ForwardAxis::X, Vec3::X),
            (ForwardAxis::Y, Vec3::Y),
            (ForwardAxis::Z, Vec3::Z),
        ] {
            let mut body = SimBody::new(1.0);
            body.use_gravity = false;
            let mut g = GuidanceModel::new(GuidanceConfig {
                mode: GuidanceMode::Laser,
                forward_axis: axis,
                turn_rate: 1.0,
                uniform_velocity: true,
                projectile_velocity: 20.0,
                ..Default::default()
            });
            // Point dead ahead, so the rotation stays level
            g.set_target_position(Vec3::new(0.0, 0.0, 40.0));
            g.toggle_tracking();

            let step = g.advance_guidance(&mut body, &(), Vec2::ZERO, DT);
            let GuidanceStep::Steered { rotation, velocity } = step else {
                panic!("expected steering for {axis:?}, got {step:?}");
            };
            assert!((velocity - rotation * unit * 20.0).length() < 1e-4);
            assert!((velocity - unit * 20.0).length() < 1e-3, "{axis:?} flew along {velocity}");
        }
    }

    #[test]
    fn test_wrong_target_kind_is_missing() {
        let mut body = SimBody::new(1.0);
        let mut g = projectile(GuidanceMode::Laser);
        g.toggle_tracking();
        g.set_tracked(Some(TargetId(1)));
        let table = [(TargetId(1), Vec3::X)];
        assert_eq!(
            g.advance_guidance(&mut body, &table[..], Vec2::ZERO, DT),
            GuidanceStep::MissingTarget
        );
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_controlled_integrates_input() {
        let mut body = SimBody::new(1.0);
        body.use_gravity = false;
        let mut g = projectile(GuidanceMode::Controlled);
        g.toggle_tracking();

        // Neutral stick keeps heading
        let step = g.advance_guidance(&mut body, &(), Vec2::ZERO, DT);
        let GuidanceStep::Steered { rotation, .. } = step else {
            panic!("expected steering");
        };
        assert_eq!(rotation, Quat::IDENTITY);

        // Holding right keeps turning, yaw keeps growing
        let mut last_yaw = 0.0;
        for _ in 0..20 {
            g.advance_guidance(&mut body, &(), Vec2::X, DT);
            body.step(DT);
            let (yaw, _, _) = body.rotation.to_euler(glam::EulerRot::YXZ);
            assert!(yaw >= last_yaw - 1e-6);
            last_yaw = yaw;
        }
        assert!(last_yaw > 0.0);
    }

    #[test]
    fn test_accelerating_speed() {
        let mut g = GuidanceModel::new(GuidanceConfig {
            mode: GuidanceMode::Laser,
            initial_velocity: 2.0,
            max_velocity: 10.0,
            acceleration_time: 0.5,
            ..Default::default()
        });
        let mut body = SimBody::new(1.0);
        g.advance_guidance(&mut body, &(), Vec2::ZERO, DT);
        assert_eq!(g.speed(), 6.0);
        g.advance_guidance(&mut body, &(), Vec2::ZERO, DT);
        assert_eq!(g.speed(), 8.0);
        g.reset();
        assert_eq!(g.speed(), 2.0);
    }

    #[test]
    fn test_config_clamped_on_write() {
        let mut g = projectile(GuidanceMode::Laser);
        g.set_turn_rate(5.0);
        assert_eq!(g.turn_rate(), 1.0);
        g.set_initial_velocity(-3.0);
        assert_eq!(g.initial_velocity(), 1.0);
        g.set_max_velocity(-1.0);
        assert_eq!(g.max_velocity(), 0.0);
        g.set_input_smoothing(-2.0);
        assert_eq!(g.input_smoothing(), 0.0);
        g.set_acceleration_time(3.0);
        assert_eq!(g.acceleration_time(), 1.0);

        // Mode survives a config swap
        g.set_config(GuidanceConfig {
            mode: GuidanceMode::Homing,
            ..Default::default()
        });
        assert_eq!(g.mode(), GuidanceMode::Laser);
    }

    #[test]
    fn test_attach_disables_gravity() {
        let mut body = SimBody::new(1.0);
        projectile(GuidanceMode::Laser).attach(&mut body);
        assert!(!body.use_gravity);
    }
}
