//! The build specification: an ordered tag → builder-prototype registry.

use crate::linear_string::StringConfig;
use crate::prismatic::PrismaticConfig;
use crate::rod::RodConfig;
use crate::tags::Tags;
use serde::{Deserialize, Serialize};

/// A builder prototype: the configuration a connector of one kind is cloned
/// from when it is bound to a pair.
///
/// The kinds form a closed set, so dispatch is an enum rather than an open
/// class hierarchy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConnectorDef {
    Rod(RodConfig),
    String(StringConfig),
    Prismatic(PrismaticConfig),
}

impl ConnectorDef {
    /// Number of discrete rigid sub-segments this kind decomposes into.
    pub fn segments(&self) -> usize {
        match self {
            Self::Rod(_) | Self::String(_) => 1,
            Self::Prismatic(config) => config.segments,
        }
    }
}

/// The tag-keyed builder registry, owned by the build phase and discarded
/// once resolution completes.
///
/// Registration order is significant: when more than one builder's tag
/// matches a pair, the first registered wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BuildSpec {
    builders: Vec<(String, ConnectorDef)>,
}

impl BuildSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a builder prototype under a tag word.
    pub fn add_builder(&mut self, tag: &str, def: ConnectorDef) {
        self.builders.push((tag.to_owned(), def));
    }

    /// Resolves the builder responsible for a pair: the first registered
    /// prototype whose tag word appears in the pair's tags. Returns `None`
    /// when no builder matches; the caller turns that into a fatal build
    /// error.
    pub fn resolve(&self, tags: &Tags) -> Option<&ConnectorDef> {
        self.builders
            .iter()
            .find(|(tag, _)| tags.contains(tag))
            .map(|(_, def)| def)
    }

    /// The registered builders, in registration order.
    pub fn builders(&self) -> &[(String, ConnectorDef)] {
        &self.builders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registered_wins_on_shared_tag() {
        let rod = RodConfig::new(0.5, 0.014).unwrap();
        let string = StringConfig::new(1000.0, 10.0).unwrap();

        let mut spec = BuildSpec::new();
        spec.add_builder("muscle", ConnectorDef::String(string));
        spec.add_builder("muscle", ConnectorDef::Rod(rod));

        let tags = Tags::from("top right muscle");
        assert!(matches!(spec.resolve(&tags), Some(ConnectorDef::String(_))));

        let mut reversed = BuildSpec::new();
        reversed.add_builder("muscle", ConnectorDef::Rod(rod));
        reversed.add_builder("muscle", ConnectorDef::String(string));
        assert!(matches!(
            reversed.resolve(&tags),
            Some(ConnectorDef::Rod(_))
        ));
    }

    #[test]
    fn unmatched_tags_resolve_to_none() {
        let rod = RodConfig::new(0.5, 0.014).unwrap();
        let mut spec = BuildSpec::new();
        spec.add_builder("rod", ConnectorDef::Rod(rod));
        assert!(spec.resolve(&Tags::from("top muscle")).is_none());
    }
}
