//! The rigid rod component.

use crate::error::{CreatorError, Result};
use crate::tags::Tags;
use crate::world::{BodyHandle, RigidBodyDef, ShapePrimitive, World};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Configuration for a rigid rod.
///
/// There is deliberately no `Default`: a rod with unspecified radius or
/// density is meaningless, so construction goes through [`RodConfig::new`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RodConfig {
    /// Capsule radius.
    pub radius: f32,
    /// Density in kg/m³.
    pub density: f32,
}

impl RodConfig {
    /// Validates and creates a rod configuration.
    pub fn new(radius: f32, density: f32) -> Result<Self> {
        if radius <= 0.0 {
            return Err(CreatorError::InvalidConfig(format!(
                "rod radius must be positive, got {radius}"
            )));
        }
        if density <= 0.0 {
            return Err(CreatorError::InvalidConfig(format!(
                "rod density must be positive, got {density}"
            )));
        }
        Ok(Self { radius, density })
    }
}

/// A rigid capsule spanning two build-time endpoints.
///
/// The rod computes its length, mass and rest transform once at construction;
/// after `setup` the solver owns its motion and this object only retains the
/// body handle for teardown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rod {
    tags: Tags,
    config: RodConfig,
    from: Vec3,
    to: Vec3,
    length: f32,
    mass: f32,
    body: Option<BodyHandle>,
}

impl Rod {
    /// Creates a rod spanning `from` → `to` carrying `tags`.
    pub fn new(tags: Tags, config: RodConfig, from: Vec3, to: Vec3) -> Self {
        let length = (to - from).length();
        let mass = Self::shape(config, length).mass(config.density);
        Self {
            tags,
            config,
            from,
            to,
            length,
            mass,
            body: None,
        }
    }

    fn shape(config: RodConfig, length: f32) -> ShapePrimitive {
        ShapePrimitive::Capsule {
            radius: config.radius,
            length,
        }
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn config(&self) -> RodConfig {
        self.config
    }

    /// Build-time length of the rod.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Mass derived from the capsule volume at the configured density.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// The body handle, once attached to a world.
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Registers the rod's rigid body with the world.
    pub fn setup(&mut self, world: &mut dyn World) {
        let axis = self.to - self.from;
        let rotation = if self.length > 0.0 {
            Quat::from_rotation_arc(Vec3::Y, axis / self.length)
        } else {
            Quat::IDENTITY
        };
        let center = self.from + axis / 2.0;
        let handle = world.add_body(RigidBodyDef {
            shape: Self::shape(self.config, self.length),
            transform: (center, rotation),
            mass: self.mass,
            density: self.config.density,
        });
        self.body = Some(handle);
    }

    /// Rods are passive; the solver integrates their motion.
    pub fn step(&mut self, _dt: f32) {}

    /// Detaches the rod from the world. Safe to call more than once.
    pub fn teardown(&mut self, world: &mut dyn World) {
        if let Some(handle) = self.body.take() {
            world.remove_body(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlueprintWorld;

    #[test]
    fn config_rejects_non_positive_values() {
        assert!(RodConfig::new(0.0, 1.0).is_err());
        assert!(RodConfig::new(0.5, -1.0).is_err());
        assert!(RodConfig::new(0.5, 1.0).is_ok());
    }

    #[test]
    fn setup_and_teardown_round_trip() {
        let config = RodConfig::new(0.5, 0.014).unwrap();
        let mut rod = Rod::new(Tags::from("top rod"), config, Vec3::ZERO, Vec3::X * 30.0);
        assert!(rod.mass() > 0.0);
        assert_eq!(rod.length(), 30.0);

        let mut world = BlueprintWorld::new();
        rod.setup(&mut world);
        assert_eq!(world.body_count(), 1);
        rod.teardown(&mut world);
        rod.teardown(&mut world);
        assert_eq!(world.body_count(), 0);
    }
}
