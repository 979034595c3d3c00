//! The physics-world collaborator interface.
//!
//! The constraint solver is out of scope for this crate; components reach it
//! through the narrow [`World`] trait, registering rigid bodies and
//! constraints described by plain descriptor structs. [`BlueprintWorld`] is a
//! recording implementation that captures everything registered into an
//! engine-agnostic blueprint, suitable for ingestion by an engine adapter or
//! for inspection in tests.

use bevy_heavy::ComputeMassProperties3d;
use bevy_math::primitives::{Capsule3d, Cylinder, Sphere};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a rigid body registered with a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Handle to a constraint registered with a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintHandle(pub u32);

/// Supported geometric primitives for rigid bodies.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ShapePrimitive {
    /// A capsule defined by radius and cylindrical length (aligned along Y).
    Capsule { radius: f32, length: f32 },
    /// A cylinder defined by radius and height (aligned along Y).
    Cylinder { radius: f32, height: f32 },
    /// A sphere defined by radius.
    Sphere(f32),
}

/// A type-erased wrapper so we can call [`ComputeMassProperties3d`] on any
/// variant.
#[derive(Clone, Copy, Debug)]
pub enum BevyPrimitive {
    Capsule(Capsule3d),
    Cylinder(Cylinder),
    Sphere(Sphere),
}

impl ComputeMassProperties3d for BevyPrimitive {
    fn mass(&self, density: f32) -> f32 {
        match self {
            Self::Capsule(s) => s.mass(density),
            Self::Cylinder(s) => s.mass(density),
            Self::Sphere(s) => s.mass(density),
        }
    }

    fn unit_principal_angular_inertia(&self) -> Vec3 {
        match self {
            Self::Capsule(s) => s.unit_principal_angular_inertia(),
            Self::Cylinder(s) => s.unit_principal_angular_inertia(),
            Self::Sphere(s) => s.unit_principal_angular_inertia(),
        }
    }

    fn center_of_mass(&self) -> Vec3 {
        match self {
            Self::Capsule(s) => s.center_of_mass(),
            Self::Cylinder(s) => s.center_of_mass(),
            Self::Sphere(s) => s.center_of_mass(),
        }
    }
}

impl ShapePrimitive {
    /// Convert to the corresponding `bevy_math` primitive for mass-property
    /// computation.
    pub fn to_bevy_primitive(self) -> BevyPrimitive {
        match self {
            Self::Capsule { radius, length } => {
                BevyPrimitive::Capsule(Capsule3d::new(radius, length))
            }
            Self::Cylinder { radius, height } => {
                BevyPrimitive::Cylinder(Cylinder::new(radius, height))
            }
            Self::Sphere(r) => BevyPrimitive::Sphere(Sphere::new(r)),
        }
    }

    /// Mass in kg at the given density, via `bevy_heavy`.
    pub fn mass(self, density: f32) -> f32 {
        self.to_bevy_primitive().mass(density)
    }
}

/// A rigid body to be registered with the solver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RigidBodyDef {
    /// The physical shape of the body.
    pub shape: ShapePrimitive,
    /// World transform of the body's center for the rest pose.
    pub transform: (Vec3, Quat),
    /// Mass in kg, derived from shape volume and density.
    pub mass: f32,
    /// Density in kg/m³ used to derive mass properties.
    pub density: f32,
}

/// A spring constraint anchored at two world-space points.
///
/// Which rigid bodies the anchors bind to is the solver's concern; this layer
/// only fixes the build-time geometry and the spring parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpringDef {
    pub from: Vec3,
    pub to: Vec3,
    pub stiffness: f32,
    pub damping: f32,
    /// Rest length at registration time.
    pub rest_length: f32,
}

/// A slider (prismatic) constraint between two rigid bodies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SliderDef {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Sliding axis in world space, unit length.
    pub axis: Vec3,
    /// Lower limit on the joint's total extension.
    pub min_length: f32,
    /// Upper limit on the joint's total extension.
    pub max_length: f32,
}

/// A constraint of any supported kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConstraintDef {
    Spring(SpringDef),
    Slider(SliderDef),
}

/// The world handle components attach themselves to during `setup`.
pub trait World {
    /// Registers a rigid body and returns its handle.
    fn add_body(&mut self, body: RigidBodyDef) -> BodyHandle;

    /// Registers a spring constraint and returns its handle.
    fn add_spring(&mut self, spring: SpringDef) -> ConstraintHandle;

    /// Registers a slider constraint and returns its handle.
    fn add_slider(&mut self, slider: SliderDef) -> ConstraintHandle;

    /// Removes a previously registered body. Unknown or already removed
    /// handles are ignored.
    fn remove_body(&mut self, handle: BodyHandle);

    /// Removes a previously registered constraint. Unknown or already removed
    /// handles are ignored.
    fn remove_constraint(&mut self, handle: ConstraintHandle);
}

/// A [`World`] implementation that records registrations into a blueprint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlueprintWorld {
    bodies: Vec<Option<RigidBodyDef>>,
    constraints: Vec<Option<ConstraintDef>>,
}

impl BlueprintWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently registered bodies, in registration order.
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBodyDef> {
        self.bodies.iter().flatten()
    }

    /// Currently registered constraints, in registration order.
    pub fn constraints(&self) -> impl Iterator<Item = &ConstraintDef> {
        self.constraints.iter().flatten()
    }

    /// Looks up a registered body by handle.
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBodyDef> {
        self.bodies.get(handle.0 as usize)?.as_ref()
    }

    /// Looks up a registered constraint by handle.
    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&ConstraintDef> {
        self.constraints.get(handle.0 as usize)?.as_ref()
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    /// Number of live constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints().count()
    }
}

impl World for BlueprintWorld {
    fn add_body(&mut self, body: RigidBodyDef) -> BodyHandle {
        self.bodies.push(Some(body));
        BodyHandle(self.bodies.len() as u32 - 1)
    }

    fn add_spring(&mut self, spring: SpringDef) -> ConstraintHandle {
        self.constraints.push(Some(ConstraintDef::Spring(spring)));
        ConstraintHandle(self.constraints.len() as u32 - 1)
    }

    fn add_slider(&mut self, slider: SliderDef) -> ConstraintHandle {
        self.constraints.push(Some(ConstraintDef::Slider(slider)));
        ConstraintHandle(self.constraints.len() as u32 - 1)
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        if let Some(slot) = self.bodies.get_mut(handle.0 as usize) {
            *slot = None;
        }
    }

    fn remove_constraint(&mut self, handle: ConstraintHandle) {
        if let Some(slot) = self.constraints.get_mut(handle.0 as usize) {
            *slot = None;
        }
    }
}

impl fmt::Display for BlueprintWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "world: {} bodies, {} constraints",
            self.body_count(),
            self.constraint_count()
        )?;
        for body in self.bodies() {
            writeln!(
                f,
                "  body {:?} mass {:.4} at {:?}",
                body.shape, body.mass, body.transform.0
            )?;
        }
        for constraint in self.constraints() {
            match constraint {
                ConstraintDef::Spring(s) => writeln!(
                    f,
                    "  spring k={} c={} rest={:.4}",
                    s.stiffness, s.damping, s.rest_length
                )?,
                ConstraintDef::Slider(s) => writeln!(
                    f,
                    "  slider {:?}<->{:?} [{:.4}, {:.4}]",
                    s.body_a, s.body_b, s.min_length, s.max_length
                )?,
            }
        }
        Ok(())
    }
}
