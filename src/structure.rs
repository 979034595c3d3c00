//! Declarative structure descriptions: nodes, tagged pairs and nested
//! sub-structures.
//!
//! A [`Structure`] is pure description. It owns no physics state and exists
//! only during the build phase; [`crate::StructureInfo`] consumes it to
//! produce the component tree.

use crate::error::{CreatorError, Result};
use crate::tags::Tags;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A labeled 3-D point. Immutable once created; owned by the [`Structure`]
/// that created it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// World-space position at description time.
    pub position: Vec3,
    /// Optional name, e.g. `"mid"` for a generated split point.
    pub name: Option<String>,
}

impl Node {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            name: None,
        }
    }

    pub fn named(position: Vec3, name: &str) -> Self {
        Self {
            position,
            name: Some(name.to_owned()),
        }
    }
}

/// An ordered, tagged connection between two node positions.
///
/// A pair snapshots the endpoint positions at the time it is added; it is a
/// relation over nodes, not an owner of them. Derived geometry is computed
/// from these build-time positions and never recomputed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    /// Start endpoint.
    pub from: Vec3,
    /// End endpoint.
    pub to: Vec3,
    /// Free-form tag words; drive builder dispatch and later lookup.
    pub tags: Tags,
}

/// An ordered collection of nodes and pairs, composable into hierarchies.
///
/// Children are exclusively owned by their parent and never copied after
/// construction. Repeated body segments are built by cloning a template
/// structure, rigidly transforming the clone, and adding it as a child.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Structure {
    nodes: Vec<Node>,
    pairs: Vec<Pair>,
    children: Vec<Structure>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at `position` and returns its index.
    pub fn add_node(&mut self, position: Vec3) -> usize {
        self.nodes.push(Node::new(position));
        self.nodes.len() - 1
    }

    /// Adds a named node at `position` and returns its index.
    pub fn add_named_node(&mut self, position: Vec3, name: &str) -> usize {
        self.nodes.push(Node::named(position, name));
        self.nodes.len() - 1
    }

    /// Connects two of this structure's nodes by index.
    ///
    /// An out-of-range index aborts the build: the error propagates to the
    /// harness rather than being recovered from.
    pub fn add_pair(&mut self, a: usize, b: usize, tags: &str) -> Result<()> {
        let len = self.nodes.len();
        for index in [a, b] {
            if index >= len {
                return Err(CreatorError::NodeOutOfRange { index, len });
            }
        }
        self.pairs.push(Pair {
            from: self.nodes[a].position,
            to: self.nodes[b].position,
            tags: Tags::from(tags),
        });
        Ok(())
    }

    /// Connects two explicit nodes, typically drawn from different children
    /// (e.g. inter-segment muscles of a snake).
    pub fn add_pair_between(&mut self, a: &Node, b: &Node, tags: &str) {
        self.pairs.push(Pair {
            from: a.position,
            to: b.position,
            tags: Tags::from(tags),
        });
    }

    /// Adds a child structure. The parent takes exclusive ownership.
    pub fn add_child(&mut self, child: Structure) {
        self.children.push(child);
    }

    /// Rigidly translates this structure — nodes, pair endpoints and all
    /// children — by `offset`.
    pub fn move_by(&mut self, offset: Vec3) {
        for node in &mut self.nodes {
            node.position += offset;
        }
        for pair in &mut self.pairs {
            pair.from += offset;
            pair.to += offset;
        }
        for child in &mut self.children {
            child.move_by(offset);
        }
    }

    /// Rigidly rotates this structure around `center`, recursively.
    pub fn rotate(&mut self, center: Vec3, rotation: Quat) {
        for node in &mut self.nodes {
            node.position = center + rotation * (node.position - center);
        }
        for pair in &mut self.pairs {
            pair.from = center + rotation * (pair.from - center);
            pair.to = center + rotation * (pair.to - center);
        }
        for child in &mut self.children {
            child.rotate(center, rotation);
        }
    }

    /// This structure's own nodes, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// This structure's own pairs, in insertion order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Child structures, in insertion order.
    pub fn children(&self) -> &[Structure] {
        &self.children
    }

    /// All pairs of this structure and its children, depth-first, children
    /// before the parent's own pairs. The order is stable across builds.
    pub fn all_pairs(&self) -> Vec<&Pair> {
        let mut out = Vec::new();
        self.collect_pairs(&mut out);
        out
    }

    fn collect_pairs<'a>(&'a self, out: &mut Vec<&'a Pair>) {
        for child in &self.children {
            child.collect_pairs(out);
        }
        out.extend(self.pairs.iter());
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(
            f,
            "{pad}structure: {} nodes, {} pairs, {} children",
            self.nodes.len(),
            self.pairs.len(),
            self.children.len()
        )?;
        for node in &self.nodes {
            match &node.name {
                Some(name) => writeln!(f, "{pad}  node '{name}' {:?}", node.position)?,
                None => writeln!(f, "{pad}  node {:?}", node.position)?,
            }
        }
        for pair in &self.pairs {
            writeln!(f, "{pad}  pair [{}] {:?} -> {:?}", pair.tags, pair.from, pair.to)?;
        }
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_index_out_of_range_is_fatal() {
        let mut s = Structure::new();
        s.add_node(Vec3::ZERO);
        let err = s.add_pair(0, 3, "rod").unwrap_err();
        assert!(matches!(
            err,
            CreatorError::NodeOutOfRange { index: 3, len: 1 }
        ));
        assert!(s.pairs().is_empty());
    }

    #[test]
    fn move_translates_nodes_and_pairs_recursively() {
        let mut child = Structure::new();
        child.add_node(Vec3::ZERO);
        child.add_node(Vec3::X);
        child.add_pair(0, 1, "rod").unwrap();

        let mut root = Structure::new();
        root.add_child(child);
        root.move_by(Vec3::new(0.0, 2.0, 10.0));

        let moved = &root.children()[0];
        assert_eq!(moved.nodes()[0].position, Vec3::new(0.0, 2.0, 10.0));
        assert_eq!(moved.pairs()[0].to, Vec3::new(1.0, 2.0, 10.0));
    }

    #[test]
    fn all_pairs_visits_children_first() {
        let mut child = Structure::new();
        child.add_node(Vec3::ZERO);
        child.add_node(Vec3::X);
        child.add_pair(0, 1, "rod").unwrap();

        let mut root = Structure::new();
        let a = Node::new(Vec3::Y);
        let b = Node::new(Vec3::Z);
        root.add_child(child);
        root.add_pair_between(&a, &b, "muscle");

        let pairs = root.all_pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].tags.contains("rod"));
        assert!(pairs[1].tags.contains("muscle"));
    }
}
