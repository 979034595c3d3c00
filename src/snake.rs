//! A snake robot assembled from repeated tetrahedral segments.
//!
//! This is the application-specific layer on top of the generic pipeline: it
//! generates one tetra [`Structure`] per body segment, connects consecutive
//! segments with eight inter-segment muscles, resolves everything through a
//! [`BuildSpec`], and exposes the resulting actuators through a name →
//! component map for external controllers.

use crate::build_spec::{BuildSpec, ConnectorDef};
use crate::error::{CreatorError, Result};
use crate::linear_string::{LinearString, StringConfig};
use crate::model::{Component, FromComponent, Model, Observer};
use crate::prismatic::PrismaticConfig;
use crate::rod::RodConfig;
use crate::structure::{Node, Structure};
use crate::structure_info::StructureInfo;
use crate::world::World;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The muscle-map keys, one per inter-segment muscle group. Each key's pairs
/// are tagged `"<key> muscle"`.
pub const MUSCLE_KEYS: [&str; 8] = [
    "top right",
    "top left",
    "front right",
    "front left",
    "back right",
    "back left",
    "bottom front",
    "bottom back",
];

/// Build-time configuration for a [`SnakeModel`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SnakeConfig {
    /// Number of tetrahedral body segments.
    pub segments: usize,
    /// Tetra edge length.
    pub edge: f32,
    /// Tetra height.
    pub height: f32,
    /// Rod configuration shared by all rigid members.
    pub rod: RodConfig,
    /// Muscle spring configuration.
    pub muscle: StringConfig,
    /// Prismatic actuator configuration for the spine members.
    pub prismatic: PrismaticConfig,
    /// When set, the top and bottom members of each tetra are realized as
    /// telescoping prismatic actuators instead of rigid rods.
    pub prismatic_spine: bool,
}

impl SnakeConfig {
    /// Validates and creates a snake configuration.
    pub fn new(
        segments: usize,
        edge: f32,
        height: f32,
        rod: RodConfig,
        muscle: StringConfig,
        prismatic: PrismaticConfig,
    ) -> Result<Self> {
        if segments == 0 {
            return Err(CreatorError::InvalidConfig(
                "snake needs at least one segment".to_owned(),
            ));
        }
        if edge <= 0.0 || height <= 0.0 {
            return Err(CreatorError::InvalidConfig(format!(
                "snake edge and height must be positive, got edge {edge}, height {height}"
            )));
        }
        Ok(Self {
            segments,
            edge,
            height,
            rod,
            muscle,
            prismatic,
            prismatic_spine: false,
        })
    }

    /// Realizes the spine members as prismatic actuators.
    pub fn with_prismatic_spine(mut self) -> Self {
        self.prismatic_spine = true;
        self
    }
}

/// The assembled snake: a [`Model`] tree plus the muscle lookup map.
#[derive(Default)]
pub struct SnakeModel {
    model: Model,
}

impl SnakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the snake from `config` and attaches it to `world`.
    pub fn setup(&mut self, config: &SnakeConfig, world: &mut dyn World) -> Result<()> {
        info!(
            edge = config.edge as f64,
            height = config.height as f64,
            segments = config.segments as u64,
            "building snake"
        );

        // One template tetra, replicated and offset per segment.
        let mut tetra = Structure::new();
        add_nodes(&mut tetra, config.edge, config.height);
        add_pairs(&mut tetra, config.prismatic_spine)?;
        tetra.move_by(Vec3::new(0.0, 2.0, 10.0));

        let mut snake = Structure::new();
        add_segments(&mut snake, &tetra, config.edge, config.segments);
        add_muscles(&mut snake);

        let mut spec = BuildSpec::new();
        spec.add_builder("rod", ConnectorDef::Rod(config.rod));
        spec.add_builder("prismatic", ConnectorDef::Prismatic(config.prismatic));
        spec.add_builder("muscle", ConnectorDef::String(config.muscle));

        let structure_info = StructureInfo::new(&snake, &spec)?;
        structure_info.build_into(&mut self.model, world)?;

        for key in MUSCLE_KEYS {
            self.model.map_components(key, &format!("{key} muscle"));
        }

        self.trace(&snake, &structure_info);
        self.model.setup(world);
        Ok(())
    }

    /// Advances the snake by `dt` seconds: observers first, then every
    /// component in construction order.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        self.model.step(dt)
    }

    /// Detaches the snake from the world.
    pub fn teardown(&mut self, world: &mut dyn World) {
        self.model.teardown(world);
    }

    /// Registers a controller notified before every physical step.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.model.add_observer(observer);
    }

    /// The components mapped under `key` (see [`MUSCLE_KEYS`]). Fails for a
    /// key that was never mapped.
    pub fn get_components(&self, key: &str) -> Result<Vec<&Component>> {
        self.model.get_components(key)
    }

    /// The muscles mapped under `key`, typed.
    pub fn muscles(&self, key: &str) -> Result<Vec<&LinearString>> {
        Ok(self
            .get_components(key)?
            .into_iter()
            .filter_map(|c| LinearString::from_component(c))
            .collect())
    }

    /// The underlying model tree, for typed lookup.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access to the model tree, for controllers.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    // Diagnostic dump of the resolved structure and the model tree. A
    // debugging side-channel, not part of the functional contract.
    fn trace(&self, structure: &Structure, structure_info: &StructureInfo) {
        info!("structure:\n{structure}");
        info!("structure info:\n{structure_info}");
        info!("model:\n{}", self.model);
    }
}

/// Rounds to five decimal places, taming accumulated float error in node
/// coordinates so repeated builds are bit-for-bit identical.
fn round5(v: f32) -> f32 {
    (v * 1e5).round() / 1e5
}

fn add_nodes(tetra: &mut Structure, edge: f32, height: f32) {
    let z = round5(3.0_f32.sqrt() / 2.0 * height);
    // right
    tetra.add_node(Vec3::new(-edge / 2.0, 0.0, z));
    // left
    tetra.add_node(Vec3::new(edge / 2.0, 0.0, z));
    // front
    tetra.add_node(Vec3::new(0.0, edge / 2.0, 0.0));
    // back
    tetra.add_node(Vec3::new(0.0, -edge / 2.0, 0.0));
}

fn add_pairs(tetra: &mut Structure, prismatic_spine: bool) -> Result<()> {
    tetra.add_pair(3, 0, "back right rod")?;
    tetra.add_pair(3, 1, "back left rod")?;
    tetra.add_pair(2, 0, "front right rod")?;
    tetra.add_pair(2, 1, "front left rod")?;
    let spine = if prismatic_spine { "prismatic" } else { "rod" };
    tetra.add_pair(0, 1, &format!("top {spine}"))?;
    tetra.add_pair(2, 3, &format!("bottom {spine}"))?;
    Ok(())
}

fn add_segments(snake: &mut Structure, tetra: &Structure, edge: f32, count: usize) {
    let offset = Vec3::new(0.0, 0.0, -0.6 * edge);
    for i in 0..count {
        let mut segment = tetra.clone();
        segment.move_by(offset * i as f32);
        snake.add_child(segment);
    }
}

// Connect consecutive segments with the eight muscle groups.
fn add_muscles(snake: &mut Structure) {
    let segments: Vec<Vec<Node>> = snake
        .children()
        .iter()
        .map(|child| child.nodes().to_vec())
        .collect();
    for window in segments.windows(2) {
        let (n0, n1) = (&window[0], &window[1]);

        snake.add_pair_between(&n0[0], &n1[0], "top right muscle");
        snake.add_pair_between(&n0[1], &n1[1], "top left muscle");

        snake.add_pair_between(&n0[2], &n1[0], "front right muscle");
        snake.add_pair_between(&n0[2], &n1[1], "front left muscle");

        snake.add_pair_between(&n0[3], &n1[0], "back right muscle");
        snake.add_pair_between(&n0[3], &n1[1], "back left muscle");

        snake.add_pair_between(&n0[2], &n1[2], "bottom front muscle");
        snake.add_pair_between(&n0[3], &n1[3], "bottom back muscle");
    }
}
