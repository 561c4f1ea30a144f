//! Raycast hover field
//!
//! Each hover point casts down its own local up axis. The closer the ground,
//! the harder that point pushes along the body's up axis, scaled by the total
//! mass including anything resting on top.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{Pose, Raycast, RigidBody};

/// Hover tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub enabled: bool,
    /// Force at zero ground distance, per unit mass per second
    pub hover_force: f32,
    /// Ray length; no force beyond it
    pub hover_distance: f32,
    /// Linear drag pushed to the body
    pub drag: f32,
    /// Angular drag pushed to the body
    pub angular_drag: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hover_force: 200.0,
            hover_distance: 0.0,
            drag: 1.0,
            angular_drag: 1.0,
        }
    }
}

impl HoverConfig {
    pub fn validate(&mut self) {
        // Force and distance are magnitudes
        self.hover_force = self.hover_force.abs();
        self.hover_distance = self.hover_distance.abs();
        if self.drag < 0.0 || self.angular_drag < 0.0 {
            log::debug!("Clamping hover drag ({}, {})", self.drag, self.angular_drag);
        }
        self.drag = self.drag.max(0.0);
        self.angular_drag = self.angular_drag.max(0.0);
    }
}

/// Where hover force is applied, relative to the body
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub local: Pose,
}

impl HoverPoint {
    pub fn at(translation: Vec3) -> Self {
        Self {
            local: Pose::from_translation(translation),
        }
    }
}

/// Contact phase reported by the collision collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Started,
    Stopped,
}

/// Another body touching the hover body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub other_mass: f32,
}

impl ContactEvent {
    pub fn started(other_mass: f32) -> Self {
        Self {
            phase: ContactPhase::Started,
            other_mass,
        }
    }

    pub fn stopped(other_mass: f32) -> Self {
        Self {
            phase: ContactPhase::Stopped,
            other_mass,
        }
    }
}

/// Resting mass resolution: units per unit of mass
const MASS_UNITS: f32 = 10_000.0;

#[inline]
fn to_units(mass: f32) -> i64 {
    (mass.max(0.0) * MASS_UNITS).round() as i64
}

/// Running total of the body's own mass plus bodies resting on it.
///
/// Updated per contact event, never recomputed from a contact list. The
/// resting share is an integer count of mass units, so any balanced run of
/// begin/end events restores it exactly, whatever else is still resting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RestingMass {
    own: f32,
    resting: i64,
    contacts: u32,
}

impl RestingMass {
    pub fn new(own: f32) -> Self {
        Self {
            own: own.max(0.0),
            resting: 0,
            contacts: 0,
        }
    }

    /// Replace the body's own mass, keeping resting contributions
    pub fn rebase(&mut self, own: f32) {
        self.own = own.max(0.0);
    }

    pub fn own(&self) -> f32 {
        self.own
    }

    pub fn resting(&self) -> f32 {
        self.resting as f32 / MASS_UNITS
    }

    pub fn contacts(&self) -> u32 {
        self.contacts
    }

    pub fn total(&self) -> f32 {
        self.own + self.resting()
    }

    pub fn on_contact(&mut self, event: ContactEvent) {
        let units = to_units(event.other_mass);
        match event.phase {
            ContactPhase::Started => {
                self.contacts += 1;
                self.resting += units;
            }
            ContactPhase::Stopped => {
                if self.contacts == 0 {
                    log::trace!("Contact end with no open contacts, ignored");
                    return;
                }
                self.contacts -= 1;
                self.resting = if self.contacts == 0 {
                    0
                } else {
                    (self.resting - units).max(0)
                };
            }
        }
    }
}

/// Multi-point hover field for one body
#[derive(Debug, Clone)]
pub struct HoverFieldModel {
    config: HoverConfig,
    points: Vec<HoverPoint>,
    mass: RestingMass,
}

impl HoverFieldModel {
    pub fn new(mut config: HoverConfig, points: Vec<HoverPoint>) -> Self {
        config.validate();
        Self {
            config,
            points,
            mass: RestingMass::default(),
        }
    }

    /// Bind to a body: record its mass and push drag settings
    pub fn attach<B: RigidBody + ?Sized>(&mut self, body: &mut B) {
        self.mass.rebase(body.mass());
        body.set_damping(self.config.drag, self.config.angular_drag);
    }

    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    /// Replace the config and push drag to the body
    pub fn set_config<B: RigidBody + ?Sized>(&mut self, mut config: HoverConfig, body: &mut B) {
        config.validate();
        self.config = config;
        self.attach(body);
    }

    pub fn points(&self) -> &[HoverPoint] {
        &self.points
    }

    pub fn is_hovering(&self) -> bool {
        self.config.enabled
    }

    pub fn toggle_hover(&mut self) {
        self.config.enabled = !self.config.enabled;
    }

    pub fn hover_force(&self) -> f32 {
        self.config.hover_force
    }

    pub fn set_hover_force(&mut self, force: f32) {
        self.config.hover_force = force;
        self.config.validate();
    }

    pub fn hover_distance(&self) -> f32 {
        self.config.hover_distance
    }

    pub fn set_hover_distance(&mut self, distance: f32) {
        self.config.hover_distance = distance;
        self.config.validate();
    }

    pub fn drag(&self) -> f32 {
        self.config.drag
    }

    pub fn set_drag<B: RigidBody + ?Sized>(&mut self, drag: f32, body: &mut B) {
        self.config.drag = drag;
        self.config.validate();
        body.set_damping(self.config.drag, self.config.angular_drag);
    }

    pub fn angular_drag(&self) -> f32 {
        self.config.angular_drag
    }

    pub fn set_angular_drag<B: RigidBody + ?Sized>(&mut self, angular_drag: f32, body: &mut B) {
        self.config.angular_drag = angular_drag;
        self.config.validate();
        body.set_damping(self.config.drag, self.config.angular_drag);
    }

    pub fn total_mass(&self) -> f32 {
        self.mass.total()
    }

    pub fn resting_mass(&self) -> &RestingMass {
        &self.mass
    }

    /// Feed a contact begin/end from the collision collaborator
    pub fn on_contact(&mut self, event: ContactEvent) {
        self.mass.on_contact(event);
    }

    /// Force fraction for a hit at `distance`: 1 touching, 0 at max range
    pub fn force_percentage(&self, distance: f32) -> f32 {
        if self.config.hover_distance <= 0.0 {
            return 0.0;
        }
        (1.0 - distance / self.config.hover_distance).max(0.0)
    }

    /// Apply the hover field for one tick, returning the summed world force
    pub fn advance_hover<B, W>(&self, body: &mut B, world: &W, dt: f32) -> Vec3
    where
        B: RigidBody + ?Sized,
        W: Raycast + ?Sized,
    {
        if !self.config.enabled || self.config.hover_distance <= 0.0 {
            return Vec3::ZERO;
        }

        let pose = body.pose();
        let body_up = pose.up();
        let scale = self.config.hover_force * dt * self.mass.total();
        let mut total = Vec3::ZERO;

        for point in &self.points {
            let world_point = pose.transform(&point.local);
            let Some(hit) = world.raycast(
                world_point.translation,
                -world_point.up(),
                self.config.hover_distance,
            ) else {
                continue;
            };

            let force = body_up * (scale * self.force_percentage(hit.distance));
            body.apply_force_at_point(force, world_point.translation);
            total += force;
        }

        total
    }
}
