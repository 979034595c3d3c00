//! Resolution of a structure description against a build specification.

use crate::build_spec::BuildSpec;
use crate::connector::ConnectorInfo;
use crate::error::{CreatorError, Result};
use crate::model::Model;
use crate::structure::Structure;
use crate::world::World;
use std::fmt;
use tracing::debug;

/// The resolved build plan: one bound [`ConnectorInfo`] per pair.
///
/// Resolution is all-or-nothing. A pair whose tags match no registered
/// builder fails the whole build before any component exists, so a partially
/// built model is never observable.
#[derive(Clone, Debug)]
pub struct StructureInfo {
    connectors: Vec<ConnectorInfo>,
}

impl StructureInfo {
    /// Resolves every pair of `structure` (children first, in description
    /// order) against `spec`.
    pub fn new(structure: &Structure, spec: &BuildSpec) -> Result<Self> {
        let mut connectors = Vec::new();
        for pair in structure.all_pairs() {
            let def = spec
                .resolve(&pair.tags)
                .ok_or_else(|| CreatorError::UnresolvedTag {
                    tags: pair.tags.to_string(),
                })?;
            let connector = ConnectorInfo::bind(def, pair);
            debug!(tags = %pair.tags, length = connector.length() as f64, "resolved pair");
            connectors.push(connector);
        }
        Ok(Self { connectors })
    }

    /// Instantiates every connector's component and appends them to `model`,
    /// in resolution order.
    ///
    /// All components are created before any is added, so a failing builder
    /// (e.g. a prismatic span below its minimum length) leaves the model
    /// untouched.
    pub fn build_into(&self, model: &mut Model, world: &mut dyn World) -> Result<()> {
        for connector in &self.connectors {
            connector.init_connector(world);
        }
        let components = self
            .connectors
            .iter()
            .map(ConnectorInfo::create_model)
            .collect::<Result<Vec<_>>>()?;
        for component in components {
            model.add_component(component);
        }
        Ok(())
    }

    /// The bound connectors, in resolution order.
    pub fn connectors(&self) -> &[ConnectorInfo] {
        &self.connectors
    }

    /// Aggregate mass of all rigid bodies the build will produce.
    pub fn mass(&self) -> f32 {
        self.connectors.iter().map(ConnectorInfo::mass).sum()
    }
}

impl fmt::Display for StructureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "structure info: {} connectors, total mass {:.4}",
            self.connectors.len(),
            self.mass()
        )?;
        for connector in &self.connectors {
            writeln!(f, "  {connector}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_spec::ConnectorDef;
    use crate::rod::RodConfig;
    use crate::world::BlueprintWorld;
    use glam::Vec3;

    #[test]
    fn unresolved_tag_fails_before_any_component() {
        let mut structure = Structure::new();
        structure.add_node(Vec3::ZERO);
        structure.add_node(Vec3::X * 10.0);
        structure.add_pair(0, 1, "muscle").unwrap();

        let mut spec = BuildSpec::new();
        spec.add_builder("rod", ConnectorDef::Rod(RodConfig::new(0.5, 0.014).unwrap()));

        let err = StructureInfo::new(&structure, &spec).unwrap_err();
        assert!(matches!(err, CreatorError::UnresolvedTag { .. }));
    }

    #[test]
    fn build_into_appends_in_resolution_order() {
        let mut structure = Structure::new();
        structure.add_node(Vec3::ZERO);
        structure.add_node(Vec3::X * 10.0);
        structure.add_node(Vec3::Y * 10.0);
        structure.add_pair(0, 1, "first rod").unwrap();
        structure.add_pair(0, 2, "second rod").unwrap();

        let mut spec = BuildSpec::new();
        spec.add_builder("rod", ConnectorDef::Rod(RodConfig::new(0.5, 0.014).unwrap()));

        let info = StructureInfo::new(&structure, &spec).unwrap();
        let mut model = Model::new();
        let mut world = BlueprintWorld::new();
        info.build_into(&mut model, &mut world).unwrap();

        assert_eq!(model.components().len(), 2);
        assert!(model.components()[0].tags().contains("first"));
        assert!(model.components()[1].tags().contains("second"));
        assert!((info.mass() - model.components().iter().map(|c| c.mass()).sum::<f32>()).abs() < 1e-4);
    }
}
