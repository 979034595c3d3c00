//! # tensegrity-creator
//!
//! A sovereign creation crate that compiles declarative tensegrity structure
//! descriptions (nodes + tagged pairs) into engine-agnostic physical models:
//! rigid rods, linear string actuators ("muscles") and telescoping prismatic
//! actuators.
//!
//! It decouples the *description* (a [`Structure`] graph) from the *phenotype*
//! (a steppable [`Model`] tree attached to a physics [`World`]). The physics
//! solver itself is an external collaborator reached through the narrow
//! [`World`] trait, so the output can be ingested by game engines (Bevy),
//! simulators, or physical manufacturing pipelines.
//!
//! The pipeline:
//!
//! 1. Describe geometry with [`Structure`] (nodes, pairs, nested children).
//! 2. Register tag-keyed builder prototypes in a [`BuildSpec`].
//! 3. Resolve the description with [`StructureInfo`], which binds one
//!    [`ConnectorInfo`] per pair and emits [`Component`]s into a [`Model`].
//! 4. Step the model each tick; query actuators by tag for control.

pub mod build_spec;
pub mod connector;
pub mod error;
pub mod linear_string;
pub mod model;
pub mod prismatic;
pub mod rod;
pub mod snake;
pub mod structure;
pub mod structure_info;
pub mod tags;
pub mod world;

pub use build_spec::*;
pub use connector::*;
pub use error::*;
pub use linear_string::*;
pub use model::*;
pub use prismatic::*;
pub use rod::*;
pub use snake::*;
pub use structure::*;
pub use structure_info::*;
pub use tags::*;
pub use world::*;
