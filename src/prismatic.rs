//! The telescoping prismatic actuator.
//!
//! A prismatic actuator is a composite component: two rigid rods laid along
//! the originating pair, split at its midpoint, joined by a slider constraint
//! that lets them telescope along the pair axis. The actuator coordinates the
//! pair's relative sliding motion; the rods themselves are ordinary passive
//! [`Rod`]s.

use crate::error::{CreatorError, Result};
use crate::linear_string::LengthSample;
use crate::model::Component;
use crate::rod::{Rod, RodConfig};
use crate::tags::Tags;
use crate::world::{BodyHandle, ConstraintHandle, SliderDef, World};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for a prismatic actuator.
///
/// No `Default` is provided; every field is load-bearing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrismaticConfig {
    /// Number of rigid sub-segments. Fixed at 2 in this design.
    pub segments: usize,
    /// Configuration of the first sub-rod.
    pub rod1: RodConfig,
    /// Configuration of the second sub-rod.
    pub rod2: RodConfig,
    /// Physical lower bound on the actuator's total length. The solver
    /// enforces it during simulation; the builder refuses to emit anything
    /// below it.
    pub min_total_length: f32,
}

impl PrismaticConfig {
    /// Validates and creates a prismatic configuration.
    pub fn new(
        segments: usize,
        rod1: RodConfig,
        rod2: RodConfig,
        min_total_length: f32,
    ) -> Result<Self> {
        if segments != 2 {
            return Err(CreatorError::InvalidConfig(format!(
                "prismatic actuators decompose into exactly 2 segments, got {segments}"
            )));
        }
        if min_total_length <= 0.0 {
            return Err(CreatorError::InvalidConfig(format!(
                "prismatic min total length must be positive, got {min_total_length}"
            )));
        }
        Ok(Self {
            segments,
            rod1,
            rod2,
            min_total_length,
        })
    }
}

/// A two-rod telescoping actuator spanning two build-time endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prismatic {
    tags: Tags,
    config: PrismaticConfig,
    from: Vec3,
    to: Vec3,
    rest_length: f32,
    target_length: Option<f32>,
    time: f32,
    history: Vec<LengthSample>,
    slider: Option<ConstraintHandle>,
    /// Always exactly two rods, built at construction.
    children: Vec<Component>,
}

impl Prismatic {
    /// Creates a prismatic actuator spanning `from` → `to`.
    ///
    /// The span is split at the midpoint into the two sub-rods, whose tag
    /// sets widen the pair's tags with `rod1` / `rod2`. Fails if the built
    /// length falls below the configured minimum: the builder never emits a
    /// configuration that violates the length bound.
    pub fn new(tags: Tags, config: PrismaticConfig, from: Vec3, to: Vec3) -> Result<Self> {
        let build_vec = to - from;
        let length = build_vec.length();
        if length < config.min_total_length {
            return Err(CreatorError::InvalidConfig(format!(
                "prismatic span {length} is below the minimum total length {}",
                config.min_total_length
            )));
        }
        let midpoint = from + build_vec / 2.0;

        let mut tags1 = tags.clone();
        tags1.add("rod1");
        let mut tags2 = tags.clone();
        tags2.add("rod2");
        let children = vec![
            Component::Rod(Rod::new(tags1, config.rod1, from, midpoint)),
            Component::Rod(Rod::new(tags2, config.rod2, midpoint, to)),
        ];

        Ok(Self {
            tags,
            config,
            from,
            to,
            rest_length: length,
            target_length: None,
            time: 0.0,
            history: Vec::new(),
            slider: None,
            children,
        })
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn config(&self) -> PrismaticConfig {
        self.config
    }

    /// The two sub-rods.
    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Mutable access to the sub-rods, for tree traversal.
    pub fn children_mut(&mut self) -> &mut [Component] {
        &mut self.children
    }

    /// Current commanded total length.
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Sum of the sub-rod masses.
    pub fn mass(&self) -> f32 {
        self.children.iter().map(Component::mass).sum()
    }

    /// Requests a new total length, applied by the next motor update and
    /// clamped to the configured minimum.
    pub fn set_target_length(&mut self, target: f32) {
        self.target_length = Some(target.max(self.config.min_total_length));
    }

    /// The length log, one sample at setup plus one per step.
    pub fn history(&self) -> &[LengthSample] {
        &self.history
    }

    fn rod_bodies(&self) -> Option<(BodyHandle, BodyHandle)> {
        let body = |c: &Component| match c {
            Component::Rod(rod) => rod.body(),
            _ => None,
        };
        Some((body(&self.children[0])?, body(&self.children[1])?))
    }

    /// Sets up the sub-rods, registers the slider constraint joining them,
    /// and logs the initial sample.
    pub fn setup(&mut self, world: &mut dyn World) {
        for child in &mut self.children {
            child.setup(world);
        }
        if let Some((body_a, body_b)) = self.rod_bodies() {
            let span = self.to - self.from;
            let handle = world.add_slider(SliderDef {
                body_a,
                body_b,
                axis: span.normalize(),
                min_length: self.config.min_total_length,
                max_length: span.length(),
            });
            self.slider = Some(handle);
        }
        self.time = 0.0;
        self.history.clear();
        self.log_history();
    }

    /// Advances the actuator by `dt` seconds: logs a sample, runs the motor
    /// update, then steps the sub-rods.
    ///
    /// Rejects `dt <= 0` before touching any state.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if dt <= 0.0 {
            return Err(CreatorError::InvalidTimeStep(dt));
        }
        self.time += dt;
        self.log_history();
        self.move_motors(dt);
        for child in &mut self.children {
            child.step(dt)?;
        }
        Ok(())
    }

    /// Detaches the slider and the sub-rods. Safe to call more than once.
    pub fn teardown(&mut self, world: &mut dyn World) {
        if let Some(handle) = self.slider.take() {
            world.remove_constraint(handle);
        }
        for child in &mut self.children {
            child.teardown(world);
        }
    }

    fn log_history(&mut self) {
        self.history.push(LengthSample {
            time: self.time,
            rest_length: self.rest_length,
        });
    }

    // Motor update hook: applies the pending target, if any. The clamp in
    // `set_target_length` keeps the command at or above the minimum.
    fn move_motors(&mut self, _dt: f32) {
        if let Some(target) = self.target_length.take() {
            self.rest_length = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BlueprintWorld, ConstraintDef};

    fn config(min_total_length: f32) -> PrismaticConfig {
        let rod = RodConfig::new(0.5, 0.014).unwrap();
        PrismaticConfig::new(2, rod, rod, min_total_length).unwrap()
    }

    #[test]
    fn config_validation() {
        let rod = RodConfig::new(0.5, 0.014).unwrap();
        assert!(PrismaticConfig::new(3, rod, rod, 5.0).is_err());
        assert!(PrismaticConfig::new(2, rod, rod, 0.0).is_err());
    }

    #[test]
    fn span_below_minimum_is_rejected() {
        let result =
            Prismatic::new(Tags::from("top prismatic"), config(5.0), Vec3::ZERO, Vec3::X * 3.0);
        assert!(result.is_err());
    }

    #[test]
    fn sub_rod_lengths_cover_the_span() {
        let p = Prismatic::new(
            Tags::from("top prismatic"),
            config(5.0),
            Vec3::ZERO,
            Vec3::X * 10.0,
        )
        .unwrap();
        let total: f32 = p
            .children()
            .iter()
            .map(|c| match c {
                Component::Rod(r) => r.length(),
                _ => 0.0,
            })
            .sum();
        assert!(total >= p.config().min_total_length);
        assert!((total - 10.0).abs() < 1e-5);
        assert!(p.mass() > 0.0);
    }

    #[test]
    fn setup_registers_two_bodies_and_a_slider() {
        let mut p = Prismatic::new(
            Tags::from("bottom prismatic"),
            config(5.0),
            Vec3::ZERO,
            Vec3::Z * 12.0,
        )
        .unwrap();
        let mut world = BlueprintWorld::new();
        p.setup(&mut world);
        assert_eq!(world.body_count(), 2);
        assert_eq!(world.constraint_count(), 1);
        let slider = world
            .constraints()
            .find_map(|c| match c {
                ConstraintDef::Slider(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(slider.min_length, 5.0);
        assert_eq!(slider.max_length, 12.0);
        assert_eq!(p.history().len(), 1);

        p.teardown(&mut world);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.constraint_count(), 0);
    }

    #[test]
    fn target_is_clamped_to_minimum() {
        let mut p = Prismatic::new(
            Tags::from("top prismatic"),
            config(5.0),
            Vec3::ZERO,
            Vec3::X * 10.0,
        )
        .unwrap();
        let mut world = BlueprintWorld::new();
        p.setup(&mut world);
        p.set_target_length(1.0);
        p.step(0.1).unwrap();
        assert_eq!(p.rest_length(), 5.0);
    }
}
