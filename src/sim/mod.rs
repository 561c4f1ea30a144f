//! Fixed-step locomotion controllers
//!
//! Every controller follows the same rules:
//! - Called once per fixed tick, never suspended
//! - Borrows its body for the call only
//! - Config is validated once on write, never per tick
//! - Smoothing state persists until an explicit reset
//!
//! Per-tick order: guidance/velocity → forces → clamp → tilt/rotation → feedback.

pub mod body;
pub mod clamp;
pub mod drone;
pub mod elevation;
pub mod guidance;
pub mod hover;
pub mod smoothing;
pub mod timer;

pub use body::{FlatGround, Pose, Raycast, RaycastHit, RigidBody, SimBody, TargetId, TargetLookup};
pub use clamp::{ActiveAxes, SpeedCeilings, clamp_magnitude, clamp_velocity};
pub use drone::{DroneConfig, DroneController, DroneInput, TiltPose};
pub use elevation::{ElevationConfig, ElevationForceModel};
pub use guidance::{
    ForwardAxis, GuidanceConfig, GuidanceMode, GuidanceModel, GuidanceStep, GuidanceTarget,
};
pub use hover::{ContactEvent, ContactPhase, HoverConfig, HoverFieldModel, HoverPoint, RestingMass};
pub use smoothing::{AxisState, smooth_damp};
pub use timer::{TimerConfig, TimerFunction, TimerText, UniversalTimer};
