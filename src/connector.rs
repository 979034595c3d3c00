//! Per-pair connector builders.
//!
//! A [`ConnectorInfo`] is a builder prototype bound to one resolved pair. It
//! is transient: it exists only long enough to compute derived geometry and
//! emit its [`Component`], and is released when the build phase ends.

use crate::build_spec::ConnectorDef;
use crate::error::Result;
use crate::linear_string::LinearString;
use crate::model::Component;
use crate::prismatic::Prismatic;
use crate::rod::Rod;
use crate::structure::Pair;
use crate::tags::Tags;
use crate::world::{ShapePrimitive, World};
use glam::Vec3;
use std::fmt;

/// A builder instance bound to a single pair.
///
/// Derived geometry (length, midpoint) is computed once from the endpoint
/// positions at bind time and never recomputed: the endpoints are build-time
/// references, not live constraints.
#[derive(Clone, Debug)]
pub struct ConnectorInfo {
    def: ConnectorDef,
    tags: Tags,
    from: Vec3,
    to: Vec3,
    length: f32,
    midpoint: Vec3,
}

impl ConnectorInfo {
    /// Clones a prototype into an instance bound to `pair`.
    pub fn bind(def: &ConnectorDef, pair: &Pair) -> Self {
        let build_vec = pair.to - pair.from;
        let length = build_vec.length();
        let midpoint = pair.from + build_vec / 2.0;
        Self {
            def: def.clone(),
            tags: pair.tags.clone(),
            from: pair.from,
            to: pair.to,
            length,
            midpoint,
        }
    }

    /// Hook for world-scoped registration needed before model creation.
    /// No current connector kind needs it.
    pub fn init_connector(&self, _world: &mut dyn World) {}

    /// Instantiates the component(s) this connector is responsible for.
    ///
    /// Simple connectors emit one component spanning the endpoints; the
    /// prismatic composite splits the span at the midpoint into two sub-rods
    /// wrapped in the actuator.
    pub fn create_model(&self) -> Result<Component> {
        Ok(match &self.def {
            ConnectorDef::Rod(config) => {
                Component::Rod(Rod::new(self.tags.clone(), *config, self.from, self.to))
            }
            ConnectorDef::String(config) => Component::LinearString(LinearString::new(
                self.tags.clone(),
                *config,
                self.from,
                self.to,
            )),
            ConnectorDef::Prismatic(config) => Component::Prismatic(Prismatic::new(
                self.tags.clone(),
                *config,
                self.from,
                self.to,
            )?),
        })
    }

    /// Aggregate mass contributed by this connector's rigid bodies. Strings
    /// are massless springs and contribute zero.
    pub fn mass(&self) -> f32 {
        match &self.def {
            ConnectorDef::Rod(config) => ShapePrimitive::Capsule {
                radius: config.radius,
                length: self.length,
            }
            .mass(config.density),
            ConnectorDef::String(_) => 0.0,
            ConnectorDef::Prismatic(config) => {
                let half = self.length / 2.0;
                let rod = |cfg: crate::rod::RodConfig| {
                    ShapePrimitive::Capsule {
                        radius: cfg.radius,
                        length: half,
                    }
                    .mass(cfg.density)
                };
                rod(config.rod1) + rod(config.rod2)
            }
        }
    }

    /// Number of discrete rigid sub-segments this connector decomposes into.
    pub fn segments(&self) -> usize {
        self.def.segments()
    }

    /// Derived segment length.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Derived segment midpoint.
    pub fn midpoint(&self) -> Vec3 {
        self.midpoint
    }

    /// The bound pair's tags.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl fmt::Display for ConnectorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.def {
            ConnectorDef::Rod(_) => "rod",
            ConnectorDef::String(_) => "string",
            ConnectorDef::Prismatic(_) => "prismatic",
        };
        write!(
            f,
            "{kind} [{}] length {:.4} midpoint {:?} segments {}",
            self.tags,
            self.length,
            self.midpoint,
            self.segments()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prismatic::PrismaticConfig;
    use crate::rod::RodConfig;

    fn pair(tags: &str, from: Vec3, to: Vec3) -> Pair {
        Pair {
            from,
            to,
            tags: Tags::from(tags),
        }
    }

    #[test]
    fn derived_geometry_is_reproducible() {
        let rod = RodConfig::new(0.5, 0.014).unwrap();
        let def = ConnectorDef::Rod(rod);
        let p = pair("rod", Vec3::new(-15.0, 0.0, 25.98), Vec3::new(15.0, 0.0, 25.98));

        let a = ConnectorInfo::bind(&def, &p);
        let b = ConnectorInfo::bind(&def, &p);
        assert_eq!(a.length(), b.length());
        assert_eq!(a.midpoint(), b.midpoint());
        assert_eq!(a.length(), 30.0);
        assert_eq!(a.midpoint(), Vec3::new(0.0, 0.0, 25.98));
    }

    #[test]
    fn prismatic_mass_aggregates_both_rods() {
        let rod = RodConfig::new(0.5, 0.014).unwrap();
        let config = PrismaticConfig::new(2, rod, rod, 5.0).unwrap();
        let def = ConnectorDef::Prismatic(config);
        let p = pair("top prismatic", Vec3::ZERO, Vec3::X * 10.0);

        let info = ConnectorInfo::bind(&def, &p);
        assert_eq!(info.segments(), 2);
        assert!(info.mass() > 0.0);

        let component = info.create_model().unwrap();
        assert!((component.mass() - info.mass()).abs() < 1e-5);
    }
}
