//! The linear elastic string ("muscle") actuator.

use crate::error::{CreatorError, Result};
use crate::tags::Tags;
use crate::world::{ConstraintHandle, SpringDef, World};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One entry of an actuator's length-over-time log.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LengthSample {
    /// Simulation time since setup, in seconds.
    pub time: f32,
    /// Commanded rest length at that time.
    pub rest_length: f32,
}

/// Configuration for a linear string actuator.
///
/// No `Default` is provided; a spring without stiffness is not a spring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StringConfig {
    /// Spring stiffness.
    pub stiffness: f32,
    /// Damping coefficient.
    pub damping: f32,
}

impl StringConfig {
    /// Validates and creates a string configuration.
    pub fn new(stiffness: f32, damping: f32) -> Result<Self> {
        if stiffness <= 0.0 {
            return Err(CreatorError::InvalidConfig(format!(
                "string stiffness must be positive, got {stiffness}"
            )));
        }
        if damping < 0.0 {
            return Err(CreatorError::InvalidConfig(format!(
                "string damping must be non-negative, got {damping}"
            )));
        }
        Ok(Self { stiffness, damping })
    }
}

/// A massless spring actuator anchored at two build-time endpoints.
///
/// Controllers actuate it by setting a target rest length; the motor update
/// during `step` applies the pending target. With no target set, the motor
/// update is a no-op.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearString {
    tags: Tags,
    config: StringConfig,
    from: Vec3,
    to: Vec3,
    rest_length: f32,
    target_rest_length: Option<f32>,
    time: f32,
    history: Vec<LengthSample>,
    constraint: Option<ConstraintHandle>,
}

impl LinearString {
    /// Creates a string spanning `from` → `to`, slack at the build distance.
    pub fn new(tags: Tags, config: StringConfig, from: Vec3, to: Vec3) -> Self {
        let rest_length = (to - from).length();
        Self {
            tags,
            config,
            from,
            to,
            rest_length,
            target_rest_length: None,
            time: 0.0,
            history: Vec::new(),
            constraint: None,
        }
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn config(&self) -> StringConfig {
        self.config
    }

    /// Current commanded rest length.
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Requests a new rest length, applied by the next motor update.
    /// Negative targets are clamped to zero.
    pub fn set_target_rest_length(&mut self, target: f32) {
        self.target_rest_length = Some(target.max(0.0));
    }

    /// The length log, one sample at setup plus one per step.
    pub fn history(&self) -> &[LengthSample] {
        &self.history
    }

    /// Registers the spring with the world and logs the initial sample.
    pub fn setup(&mut self, world: &mut dyn World) {
        let handle = world.add_spring(SpringDef {
            from: self.from,
            to: self.to,
            stiffness: self.config.stiffness,
            damping: self.config.damping,
            rest_length: self.rest_length,
        });
        self.constraint = Some(handle);
        self.time = 0.0;
        self.history.clear();
        self.log_history();
    }

    /// Advances the actuator by `dt` seconds.
    ///
    /// Rejects `dt <= 0` before touching any state, so a failed step leaves
    /// the history and rest length exactly as they were.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if dt <= 0.0 {
            return Err(CreatorError::InvalidTimeStep(dt));
        }
        self.time += dt;
        self.log_history();
        self.move_motors(dt);
        Ok(())
    }

    /// Detaches the spring from the world. Safe to call more than once.
    pub fn teardown(&mut self, world: &mut dyn World) {
        if let Some(handle) = self.constraint.take() {
            world.remove_constraint(handle);
        }
    }

    fn log_history(&mut self) {
        self.history.push(LengthSample {
            time: self.time,
            rest_length: self.rest_length,
        });
    }

    // Motor update hook: applies the pending target, if any.
    fn move_motors(&mut self, _dt: f32) {
        if let Some(target) = self.target_rest_length.take() {
            self.rest_length = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BlueprintWorld;

    fn string() -> LinearString {
        let config = StringConfig::new(1000.0, 10.0).unwrap();
        LinearString::new(Tags::from("top right muscle"), config, Vec3::ZERO, Vec3::X * 5.0)
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(StringConfig::new(0.0, 10.0).is_err());
        assert!(StringConfig::new(1000.0, -1.0).is_err());
    }

    #[test]
    fn setup_logs_time_zero_sample() {
        let mut s = string();
        let mut world = BlueprintWorld::new();
        s.setup(&mut world);
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].time, 0.0);
        assert_eq!(s.history()[0].rest_length, 5.0);
    }

    #[test]
    fn bad_dt_leaves_state_untouched() {
        let mut s = string();
        let mut world = BlueprintWorld::new();
        s.setup(&mut world);
        s.set_target_rest_length(2.0);
        assert!(matches!(
            s.step(0.0),
            Err(CreatorError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            s.step(-0.1),
            Err(CreatorError::InvalidTimeStep(_))
        ));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.rest_length(), 5.0);
    }

    #[test]
    fn step_logs_and_applies_target() {
        let mut s = string();
        let mut world = BlueprintWorld::new();
        s.setup(&mut world);
        s.set_target_rest_length(2.0);
        s.step(0.1).unwrap();
        assert_eq!(s.rest_length(), 2.0);
        assert_eq!(s.history().len(), 2);
        assert!((s.history()[1].time - 0.1).abs() < 1e-6);
        // Without a pending target the motor update is a no-op.
        s.step(0.1).unwrap();
        assert_eq!(s.rest_length(), 2.0);
    }
}
