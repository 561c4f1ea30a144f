//! Critically damped smoothing
//!
//! Spring-damper toward a target with no overshoot, used for drone tilt,
//! yaw and controlled-guidance input. The derivative lives in an
//! [`AxisState`] owned by the caller so continuity survives across ticks.

use crate::consts::MAX_SMOOTHING_SPEED;

/// Advance `current` toward `target`.
///
/// Returns the new value and the new derivative. `damping_time` is roughly the
/// time to reach the target; zero or negative snaps immediately.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity_ref: f32,
    damping_time: f32,
    dt: f32,
) -> (f32, f32) {
    if dt <= 0.0 || !dt.is_finite() {
        return (current, velocity_ref);
    }
    if damping_time.is_nan() || damping_time <= 0.0 {
        return (target, 0.0);
    }

    let omega = 2.0 / damping_time;
    let x = omega * dt;
    // Padé approximation of exp(-x)
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = MAX_SMOOTHING_SPEED * damping_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (velocity_ref + omega * change) * dt;
    let mut velocity = (velocity_ref - omega * temp) * decay;
    let mut value = clamped_target + (change + temp) * decay;

    // Never step past the target
    if (target - current > 0.0) == (value > target) {
        value = target;
        velocity = (value - target) / dt;
    }

    (
        value,
        velocity.clamp(-MAX_SMOOTHING_SPEED, MAX_SMOOTHING_SPEED),
    )
}

/// Per-axis smoothing state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisState {
    pub current: f32,
    pub target: f32,
    pub velocity_ref: f32,
}

impl AxisState {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            velocity_ref: 0.0,
        }
    }

    /// Retarget and advance one step, returning the new value
    pub fn advance(&mut self, target: f32, damping_time: f32, dt: f32) -> f32 {
        self.target = target;
        let (value, velocity) =
            smooth_damp(self.current, target, self.velocity_ref, damping_time, dt);
        self.current = value;
        self.velocity_ref = velocity;
        value
    }

    /// Explicit re-initialization; the only way the derivative is dropped
    pub fn reset(&mut self, value: f32) {
        *self = Self::new(value);
    }
}
